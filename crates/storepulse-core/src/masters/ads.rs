use polars::prelude::*;

use crate::config::Thresholds;
use crate::error::Result;
use crate::types::CleanAds;

/// Build the ads performance master: one row per (Ad_Name, Ad_Type, Status,
/// Platform) with ratios recomputed from the summed fields and a campaign
/// health label.
pub fn build_ads_performance(ads: &CleanAds, thresholds: &Thresholds) -> Result<DataFrame> {
    let mut source = ads.frame().clone();
    for name in ["Ad_Type", "Status"] {
        if source.column(name).is_err() {
            let blanks = vec![String::new(); source.height()];
            source.with_column(Series::new(name.into(), blanks))?;
        }
    }

    let mut df = source
        .lazy()
        .group_by([col("Ad_Name"), col("Ad_Type"), col("Status"), col("Platform")])
        .agg([
            col("Impressions").sum().alias("Total_Impressions"),
            col("Clicks").sum().alias("Total_Clicks"),
            col("Orders").sum().alias("Total_Orders"),
            col("Direct_Orders").sum().alias("Total_Direct_Orders"),
            col("Products_Sold").sum().alias("Total_Products_Sold"),
            col("Sales").sum().alias("Total_Sales"),
            col("Direct_Sales").sum().alias("Total_Direct_Sales"),
            col("Ad_Cost").sum().alias("Total_Cost"),
        ])
        .sort(
            ["Total_Sales", "Ad_Name", "Ad_Type", "Status", "Platform"],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false, false, false, false]),
        )
        .collect()?;

    let impressions: Vec<i64> = df
        .column("Total_Impressions")?
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect();
    let clicks: Vec<i64> = df
        .column("Total_Clicks")?
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect();
    let orders: Vec<i64> = df
        .column("Total_Orders")?
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect();
    let sales: Vec<f64> = df
        .column("Total_Sales")?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    let cost: Vec<f64> = df
        .column("Total_Cost")?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    // every ratio is a plain fraction, null when undefined
    let ctr: Vec<Option<f64>> = (0..df.height())
        .map(|i| (impressions[i] != 0).then(|| clicks[i] as f64 / impressions[i] as f64))
        .collect();
    let conversion: Vec<Option<f64>> = (0..df.height())
        .map(|i| (clicks[i] != 0).then(|| orders[i] as f64 / clicks[i] as f64))
        .collect();
    let roas: Vec<Option<f64>> = (0..df.height())
        .map(|i| (cost[i] != 0.0).then(|| sales[i] / cost[i]))
        .collect();
    let acos: Vec<Option<f64>> = (0..df.height())
        .map(|i| (sales[i] != 0.0).then(|| cost[i] / sales[i]))
        .collect();

    let health: Vec<String> = (0..df.height())
        .map(|i| {
            match roas[i] {
                Some(r) if r >= thresholds.roas_excellent => "excellent",
                Some(r) if r >= thresholds.roas_good => "good",
                Some(r) if r >= thresholds.roas_breakeven => "break-even",
                // losing money or spending without a measurable return
                _ if orders[i] == 0 && clicks[i] > thresholds.bleeding_min_clicks => "bleeding",
                _ => "needs-monitoring",
            }
            .to_string()
        })
        .collect();

    df.with_column(Series::new("CTR".into(), ctr))?;
    df.with_column(Series::new("Conversion_Rate".into(), conversion))?;
    df.with_column(Series::new("ROAS".into(), roas))?;
    df.with_column(Series::new("ACOS".into(), acos))?;
    df.with_column(Series::new("Campaign_Health".into(), health))?;

    Ok(df)
}
