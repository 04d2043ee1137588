use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use storepulse_core::{run_pipeline, DashboardStore, PipelineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Storepulse batch ETL for the sales dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full batch pipeline
    Run(RunArgs),
    /// Print the KPI summary from the dashboard database
    Kpis(DbArgs),
    /// Run an ad-hoc read query against the dashboard database
    Query(QueryArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Pipeline configuration file
    #[arg(long, default_value = "storepulse.toml")]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct DbArgs {
    /// Dashboard database file
    #[arg(long)]
    db: PathBuf,
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[command(flatten)]
    db: DbArgs,
    /// SQL to run
    sql: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let config = PipelineConfig::from_toml_file(&args.config)
                .with_context(|| format!("reading config {}", args.config.display()))?;
            let summary = run_pipeline(&config)?;
            println!("{}", serde_json::to_string(&summary)?);
            info!(
                exports = summary.exports.len(),
                skipped_masters = summary.skipped_masters.len(),
                "run finished"
            );
            Ok(())
        }
        Command::Kpis(args) => {
            let store = DashboardStore::open_read_only(&args.db)?;
            let rows = store.query("SELECT * FROM kpi_summary ORDER BY Platform")?;
            print_table(&rows);
            Ok(())
        }
        Command::Query(args) => {
            let store = DashboardStore::open_read_only(&args.db.db)?;
            let rows = store.query(&args.sql)?;
            for row in rows {
                println!("{row}");
            }
            Ok(())
        }
    }
}

fn print_table(rows: &[serde_json::Value]) {
    let mut table = Table::new();
    let Some(first) = rows.first().and_then(|row| row.as_object()) else {
        println!("no rows");
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    table.set_header(&headers);
    for row in rows {
        let Some(object) = row.as_object() else {
            continue;
        };
        let cells: Vec<String> = headers
            .iter()
            .map(|key| match object.get(key) {
                Some(serde_json::Value::Null) | None => String::new(),
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
            })
            .collect();
        table.add_row(cells);
    }
    println!("{table}");
}
