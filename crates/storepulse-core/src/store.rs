//! Embedded DuckDB store for the dashboard.
//!
//! Tables are rebuilt from the flat CSV exports with
//! `CREATE OR REPLACE TABLE ... AS SELECT * FROM read_csv(...)`, so a rerun
//! drops and recreates each table in one statement and a half-written table
//! can never survive.

use std::path::Path;

use duckdb::types::Value;
use serde_json::{json, Map};

use crate::error::{PipelineError, Result};

pub struct DashboardStore {
    conn: duckdb::Connection,
}

impl DashboardStore {
    /// Open or create the database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = duckdb::Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an existing database without write access, for query tooling
    /// that must never race a pipeline run.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let config = duckdb::Config::default().access_mode(duckdb::AccessMode::ReadOnly)?;
        let conn = duckdb::Connection::open_with_flags(path, config)?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests.
    pub fn memory() -> Result<Self> {
        let conn = duckdb::Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Replace one table with the contents of a CSV export.
    pub fn replace_from_csv(&self, table: &str, csv_path: &Path) -> Result<()> {
        if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PipelineError::Validation(format!(
                "invalid table name '{table}'"
            )));
        }
        let path = csv_path.display().to_string().replace('\'', "''");
        let sql = format!(
            "CREATE OR REPLACE TABLE {table} AS SELECT * FROM read_csv('{path}', header = true)"
        );
        self.conn.execute_batch(&sql)?;
        tracing::debug!(table, file = %csv_path.display(), "replaced table");
        Ok(())
    }

    /// (Re)create the dashboard views over the master tables.
    ///
    /// Each view binds independently; a view whose source table is missing
    /// (because its category failed this run) is logged and skipped so the
    /// others still refresh.
    pub fn create_views(&self) -> Result<()> {
        const VIEWS: &[(&str, &str)] = &[
            (
                "kpi_summary",
                "CREATE OR REPLACE VIEW kpi_summary AS
                 SELECT Platform,
                        SUM(GMV) AS Total_GMV,
                        SUM(Total_Orders) AS Total_Orders,
                        SUM(Net_Revenue) AS Net_Revenue,
                        SUM(Units_Sold) AS Units_Sold,
                        AVG(AOV) AS Avg_AOV
                 FROM daily_sales
                 GROUP BY Platform",
            ),
            (
                "top_products",
                "CREATE OR REPLACE VIEW top_products AS
                 SELECT Product_Name, SKU, Platform, Total_GMV, Total_Qty,
                        Segment, GMV_Contribution_Pct
                 FROM products
                 ORDER BY Total_GMV DESC
                 LIMIT 20",
            ),
            (
                "daily_trend",
                "CREATE OR REPLACE VIEW daily_trend AS
                 SELECT Date, Platform, GMV, Total_Orders, AOV, Growth_DoD, Growth_WoW
                 FROM daily_sales
                 ORDER BY Date",
            ),
        ];
        for (name, sql) in VIEWS {
            if let Err(err) = self.conn.execute_batch(sql) {
                tracing::warn!(view = name, error = %err, "view not created");
            }
        }
        Ok(())
    }

    /// Run a read query and return each row as a JSON object.
    pub fn query(&self, sql: &str) -> Result<Vec<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        let mut names: Option<Vec<String>> = None;
        while let Some(row) = rows.next()? {
            let names = names.get_or_insert_with(|| row.as_ref().column_names());
            let mut object = Map::new();
            for (idx, name) in names.iter().enumerate() {
                let value: Value = row.get(idx)?;
                object.insert(name.clone(), to_json(value));
            }
            out.push(serde_json::Value::Object(object));
        }
        Ok(out)
    }
}

fn to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => json!(b),
        Value::TinyInt(v) => json!(v),
        Value::SmallInt(v) => json!(v),
        Value::Int(v) => json!(v),
        Value::BigInt(v) => json!(v),
        Value::UTinyInt(v) => json!(v),
        Value::USmallInt(v) => json!(v),
        Value::UInt(v) => json!(v),
        Value::UBigInt(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Double(v) => json!(v),
        Value::Text(s) => json!(s),
        other => serde_json::Value::String(format!("{other:?}")),
    }
}
