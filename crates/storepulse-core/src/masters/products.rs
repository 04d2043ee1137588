use polars::prelude::*;

use crate::config::Thresholds;
use crate::error::Result;
use crate::masters::quantile;
use crate::types::CleanOrders;

/// Build the product sales master: one row per (Product_Name, SKU,
/// Platform), median-split segments, GMV contribution and a portfolio-level
/// risk status. Sorted by Total_GMV descending.
pub fn build_product_sales(orders: &CleanOrders, thresholds: &Thresholds) -> Result<DataFrame> {
    let mut source = orders.frame().clone();
    if source.column("SKU").is_err() {
        let blanks = vec![String::new(); source.height()];
        source.with_column(Series::new("SKU".into(), blanks))?;
    }

    let mut df = source
        .lazy()
        .group_by([col("Product_Name"), col("SKU"), col("Platform")])
        .agg([
            col("Net_Sales").sum().alias("Total_GMV"),
            col("True_Net_Revenue").sum().alias("Net_Revenue"),
            col("Total_Discount").sum().alias("Total_Discount"),
            col("Quantity").sum().alias("Total_Qty"),
            col("Order_ID")
                .n_unique()
                .cast(DataType::Int64)
                .alias("Order_Count"),
        ])
        .sort(
            // group keys break GMV ties so reruns emit identical bytes
            ["Total_GMV", "Product_Name", "SKU", "Platform"],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false, false, false]),
        )
        .collect()?;

    let gmv: Vec<f64> = df
        .column("Total_GMV")?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    let qty: Vec<i64> = df
        .column("Total_Qty")?
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect();

    let avg_price: Vec<Option<f64>> = (0..df.height())
        .map(|i| (qty[i] != 0).then(|| gmv[i] / qty[i] as f64))
        .collect();
    df.with_column(Series::new("Avg_Price".into(), avg_price))?;

    // median split into four quadrants
    let gmv_median = quantile(&gmv, 0.5).unwrap_or(0.0);
    let qty_values: Vec<f64> = qty.iter().map(|q| *q as f64).collect();
    let qty_median = quantile(&qty_values, 0.5).unwrap_or(0.0);
    let segments: Vec<&'static str> = (0..df.height())
        .map(|i| {
            let high_gmv = gmv[i] > gmv_median;
            let high_qty = qty[i] as f64 > qty_median;
            match (high_gmv, high_qty) {
                (true, true) => "Star",
                (true, false) => "Hero",
                (false, true) => "Volume",
                (false, false) => "Core",
            }
        })
        .collect();

    let total_gmv: f64 = gmv.iter().sum();
    let contribution: Vec<Option<f64>> = gmv
        .iter()
        .map(|value| (total_gmv != 0.0).then(|| (value / total_gmv * 100.0 * 100.0).round() / 100.0))
        .collect();

    // hero products that dominate GMV are a concentration risk; core
    // products that barely contribute need a push
    let risk: Vec<String> = (0..df.height())
        .map(|i| {
            let pct = contribution[i].unwrap_or(0.0);
            if segments[i] == "Hero" && pct > thresholds.hero_reliance_pct {
                "over-reliance"
            } else if segments[i] == "Core" && pct < thresholds.core_push_pct {
                "needs-push"
            } else {
                "healthy"
            }
            .to_string()
        })
        .collect();

    let segment_column: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
    df.with_column(Series::new("Segment".into(), segment_column))?;
    df.with_column(Series::new("GMV_Contribution_Pct".into(), contribution))?;
    df.with_column(Series::new("Risk_Status".into(), risk))?;

    Ok(df)
}
