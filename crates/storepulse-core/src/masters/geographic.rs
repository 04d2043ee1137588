use polars::prelude::*;

use crate::error::Result;
use crate::types::CleanOrders;

fn with_province(orders: &CleanOrders) -> Result<DataFrame> {
    let mut df = orders.frame().clone();
    if df.column("Province").is_err() {
        let blanks = vec![String::new(); df.height()];
        df.with_column(Series::new("Province".into(), blanks))?;
    }
    Ok(df)
}

fn add_aov(df: &mut DataFrame) -> Result<()> {
    let gmv: Vec<f64> = df
        .column("GMV")?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    let orders: Vec<i64> = df
        .column("Total_Orders")?
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect();
    let aov: Vec<Option<f64>> = (0..df.height())
        .map(|i| (orders[i] != 0).then(|| gmv[i] / orders[i] as f64))
        .collect();
    df.with_column(Series::new("AOV".into(), aov))?;
    Ok(())
}

/// Build the geographic master: one row per (Province, Platform), sorted by
/// GMV descending.
pub fn build_geographic(orders: &CleanOrders) -> Result<DataFrame> {
    let mut df = with_province(orders)?
        .lazy()
        .group_by([col("Province"), col("Platform")])
        .agg([
            col("Order_ID")
                .n_unique()
                .cast(DataType::Int64)
                .alias("Total_Orders"),
            col("Net_Sales").sum().alias("GMV"),
            col("Quantity").sum().alias("Units_Sold"),
        ])
        .sort(
            ["GMV", "Province", "Platform"],
            SortMultipleOptions::default().with_order_descending_multi([true, false, false]),
        )
        .collect()?;
    add_aov(&mut df)?;
    Ok(df)
}

/// Per-day variant of the geographic master, for time-filtered dashboard
/// queries.
pub fn build_daily_geographic(orders: &CleanOrders) -> Result<DataFrame> {
    let mut df = with_province(orders)?
        .lazy()
        .group_by([col("Date"), col("Province"), col("Platform")])
        .agg([
            col("Order_ID")
                .n_unique()
                .cast(DataType::Int64)
                .alias("Total_Orders"),
            col("Net_Sales").sum().alias("GMV"),
            col("Quantity").sum().alias("Units_Sold"),
        ])
        .sort(["Date", "Province", "Platform"], SortMultipleOptions::default())
        .collect()?;
    add_aov(&mut df)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CleanOrders;

    fn orders_with_provinces(rows: &[(&str, &str, &str, f64)]) -> CleanOrders {
        let dates: Vec<String> = rows.iter().map(|r| r.0.to_string()).collect();
        let provinces: Vec<String> = rows.iter().map(|r| r.1.to_string()).collect();
        let ids: Vec<String> = rows.iter().map(|r| r.2.to_string()).collect();
        let sales: Vec<f64> = rows.iter().map(|r| r.3).collect();
        let n = rows.len();
        let df = DataFrame::new(vec![
            Series::new("Date".into(), dates).into_column(),
            Series::new("Province".into(), provinces).into_column(),
            Series::new("Order_ID".into(), ids).into_column(),
            Series::new("Net_Sales".into(), sales).into_column(),
            Series::new("Quantity".into(), vec![1_i64; n]).into_column(),
            Series::new("Platform".into(), vec!["marketplace".to_string(); n]).into_column(),
        ])
        .expect("frame");
        CleanOrders::new(df)
    }

    #[test]
    fn provinces_sort_by_gmv_descending() {
        let orders = orders_with_provinces(&[
            ("2026-01-01", "เชียงใหม่", "A", 100.0),
            ("2026-01-01", "กรุงเทพมหานคร", "B", 900.0),
            ("2026-01-02", "กรุงเทพมหานคร", "C", 600.0),
        ]);
        let geo = build_geographic(&orders).expect("geo");

        assert_eq!(geo.height(), 2);
        let provinces = geo.column("Province").expect("col").str().expect("utf8");
        assert_eq!(provinces.get(0), Some("กรุงเทพมหานคร"));
        let gmv = geo.column("GMV").expect("col").f64().expect("f64");
        assert_eq!(gmv.get(0), Some(1500.0));
        let aov = geo.column("AOV").expect("col").f64().expect("f64");
        assert_eq!(aov.get(0), Some(750.0));
    }

    #[test]
    fn daily_geographic_keeps_the_date_axis() {
        let orders = orders_with_provinces(&[
            ("2026-01-01", "กรุงเทพมหานคร", "A", 100.0),
            ("2026-01-02", "กรุงเทพมหานคร", "B", 200.0),
        ]);
        let daily_geo = build_daily_geographic(&orders).expect("daily geo");

        assert_eq!(daily_geo.height(), 2);
        let dates = daily_geo.column("Date").expect("col").str().expect("utf8");
        assert_eq!(dates.get(0), Some("2026-01-01"));
    }
}
