//! Raw-to-clean conversion: status and keyword filtering, typed numeric
//! columns, derived fee and revenue columns.
//!
//! Every function here takes a raw all-string frame from the parser crate
//! and returns one of the typed wrappers in [`crate::types`]. Aggregations
//! only accept those wrappers, so unconverted strings can never reach them.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use storepulse_parser::{parse_currency, parse_duration, parse_percentage, Platform};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::types::{
    CleanAds, CleanLive, CleanOrders, CleanShortVideoLive, CleanShortVideoVideo, CleanVideo,
};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M"];

/// Normalize a source date string to ISO `YYYY-MM-DD`.
fn normalize_date(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.to_string());
    }
    for format in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date().to_string());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date.to_string());
    }
    None
}

fn str_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Replace a raw string column with its f64 conversion. Missing columns are
/// materialized as zero so derived sums stay defined.
fn convert_f64(df: &mut DataFrame, name: &str, convert: fn(&str) -> f64) -> Result<()> {
    let values: Vec<f64> = if has_column(df, name) {
        str_values(df, name)?.iter().map(|v| convert(v)).collect()
    } else {
        vec![0.0; df.height()]
    };
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

fn convert_i64(df: &mut DataFrame, name: &str) -> Result<()> {
    let values: Vec<i64> = if has_column(df, name) {
        str_values(df, name)?
            .iter()
            .map(|v| {
                let cleaned: String = v.chars().filter(|c| *c != ',').collect();
                cleaned.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0)
            })
            .collect()
    } else {
        vec![0; df.height()]
    };
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(df
        .column(name)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}

fn stamp_platform(df: &mut DataFrame, platform: Platform) -> Result<()> {
    let values = vec![platform.as_str().to_string(); df.height()];
    df.with_column(Series::new("Platform".into(), values))?;
    Ok(())
}

fn require_columns(df: &DataFrame, required: &[&str], table: &str) -> Result<()> {
    for name in required {
        if !has_column(df, name) {
            return Err(PipelineError::Validation(format!(
                "{table} table is missing required column '{name}'"
            )));
        }
    }
    Ok(())
}

/// Clean marketplace order lines.
///
/// Rows are dropped when the order status is not in the configured
/// allow-list or when the product name contains an excluded keyword.
/// Dates normalize to an ISO `Date` column; rows whose date cannot be
/// parsed are dropped rather than mis-bucketed.
pub fn clean_orders(raw: DataFrame, config: &PipelineConfig) -> Result<CleanOrders> {
    require_columns(
        &raw,
        &["Order_ID", "Order_Status", "Order_Date", "Product_Name", "Net_Sales"],
        "orders",
    )?;

    let statuses = str_values(&raw, "Order_Status")?;
    let products = str_values(&raw, "Product_Name")?;
    let dates = str_values(&raw, "Order_Date")?;

    let keywords: Vec<String> = config
        .exclude_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect();

    let keep: Vec<bool> = (0..raw.height())
        .map(|idx| {
            let status_ok = config.valid_statuses.iter().any(|s| s == &statuses[idx]);
            let product = products[idx].to_lowercase();
            let keyword_hit = keywords.iter().any(|k| product.contains(k.as_str()));
            status_ok && !keyword_hit && normalize_date(&dates[idx]).is_some()
        })
        .collect();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let mut df = raw.filter(&mask)?;

    let iso_dates: Vec<String> = str_values(&df, "Order_Date")?
        .iter()
        .map(|v| normalize_date(v).unwrap_or_default())
        .collect();
    df.with_column(Series::new("Date".into(), iso_dates))?;

    for name in [
        "Original_Price",
        "Selling_Price",
        "Net_Sales",
        "Marketplace_Discount",
        "Seller_Discount",
        "Commission",
        "Transaction_Fee",
        "Service_Fee",
        "Shipping_Fee",
        "Total_Amount",
    ] {
        convert_f64(&mut df, name, parse_currency)?;
    }
    for name in ["Quantity", "Return_Qty"] {
        convert_i64(&mut df, name)?;
    }

    let commission = f64_column(&df, "Commission")?;
    let transaction = f64_column(&df, "Transaction_Fee")?;
    let service = f64_column(&df, "Service_Fee")?;
    let net_sales = f64_column(&df, "Net_Sales")?;
    let marketplace_discount = f64_column(&df, "Marketplace_Discount")?;
    let seller_discount = f64_column(&df, "Seller_Discount")?;

    let total_fees: Vec<f64> = (0..df.height())
        .map(|i| commission[i] + transaction[i] + service[i])
        .collect();
    let true_net: Vec<f64> = (0..df.height())
        .map(|i| net_sales[i] - total_fees[i])
        .collect();
    let total_discount: Vec<f64> = (0..df.height())
        .map(|i| marketplace_discount[i] + seller_discount[i])
        .collect();

    df.with_column(Series::new("Total_Fees".into(), total_fees))?;
    df.with_column(Series::new("True_Net_Revenue".into(), true_net))?;
    df.with_column(Series::new("Total_Discount".into(), total_discount))?;
    stamp_platform(&mut df, Platform::Marketplace)?;

    Ok(CleanOrders::new(df))
}

/// Clean the ads report. ROAS and ACOS are recomputed from cost and sales
/// instead of trusting the exported ratio columns; both are null, not zero,
/// when the denominator is zero.
pub fn clean_ads(raw: DataFrame) -> Result<CleanAds> {
    require_columns(&raw, &["Ad_Name", "Ad_Cost", "Sales"], "ads")?;
    let mut df = raw;

    for name in ["Sales", "Direct_Sales", "Ad_Cost"] {
        convert_f64(&mut df, name, parse_currency)?;
    }
    for name in ["CTR", "Conversion_Rate"] {
        convert_f64(&mut df, name, parse_percentage)?;
    }
    for name in [
        "Impressions",
        "Clicks",
        "Orders",
        "Direct_Orders",
        "Products_Sold",
    ] {
        convert_i64(&mut df, name)?;
    }

    let sales = f64_column(&df, "Sales")?;
    let cost = f64_column(&df, "Ad_Cost")?;
    let roas: Vec<Option<f64>> = (0..df.height())
        .map(|i| (cost[i] != 0.0).then(|| sales[i] / cost[i]))
        .collect();
    let acos: Vec<Option<f64>> = (0..df.height())
        .map(|i| (sales[i] != 0.0).then(|| cost[i] / sales[i]))
        .collect();
    df.with_column(Series::new("ROAS".into(), roas))?;
    df.with_column(Series::new("ACOS".into(), acos))?;
    stamp_platform(&mut df, Platform::Marketplace)?;

    Ok(CleanAds::new(df))
}

/// Clean the daily live overview rows.
pub fn clean_live(raw: DataFrame) -> Result<CleanLive> {
    require_columns(&raw, &["Report_Date"], "live")?;
    let mut df = raw;

    for name in ["Sales_Pending", "Sales_Confirmed", "GPM_Pending", "GPM_Confirmed"] {
        convert_f64(&mut df, name, parse_currency)?;
    }
    for name in [
        "Orders_Pending",
        "Orders_Confirmed",
        "Total_Live_Sessions",
        "Total_Viewers",
        "Peak_Concurrent_Users",
    ] {
        convert_i64(&mut df, name)?;
    }

    let durations: Vec<i64> = if has_column(&df, "Total_Live_Duration") {
        str_values(&df, "Total_Live_Duration")?
            .iter()
            .map(|v| parse_duration(v))
            .collect()
    } else {
        vec![0; df.height()]
    };
    let hours: Vec<f64> = durations.iter().map(|s| *s as f64 / 3600.0).collect();
    df.with_column(Series::new("Live_Duration_Seconds".into(), durations))?;
    df.with_column(Series::new("Live_Duration_Hours".into(), hours))?;
    stamp_platform(&mut df, Platform::Marketplace)?;

    Ok(CleanLive::new(df))
}

/// Clean the daily video overview rows.
pub fn clean_video(raw: DataFrame) -> Result<CleanVideo> {
    require_columns(&raw, &["Report_Date"], "video")?;
    let mut df = raw;

    for name in [
        "Video_Sales_Pending",
        "Video_Sales_Confirmed",
        "Video_GPM_Pending",
        "Video_GPM_Confirmed",
    ] {
        convert_f64(&mut df, name, parse_currency)?;
    }
    for name in [
        "Video_Orders_Pending",
        "Video_Orders_Confirmed",
        "Total_Viewers",
        "Total_Views",
        "Videos_With_Products",
        "Revenue_Generating_Videos",
        "Total_Likes",
        "Total_Shares",
        "Total_Comments",
        "New_Followers",
    ] {
        convert_i64(&mut df, name)?;
    }
    stamp_platform(&mut df, Platform::Marketplace)?;

    Ok(CleanVideo::new(df))
}

/// Clean short-video live session records.
pub fn clean_short_video_live(raw: DataFrame) -> Result<CleanShortVideoLive> {
    let mut df = raw;

    for name in ["GMV", "Live_GMV", "Avg_Price"] {
        convert_f64(&mut df, name, parse_currency)?;
    }
    for name in ["CTR", "Click_Through_Rate"] {
        convert_f64(&mut df, name, parse_percentage)?;
    }
    for name in [
        "Products_Added",
        "Products_Sold",
        "Orders_Created",
        "Orders",
        "Items_Sold",
        "Unique_Customers",
        "Viewers",
        "Views",
        "Comments",
        "Shares",
        "Likes",
        "New_Followers",
        "Product_Impressions",
        "Product_Clicks",
    ] {
        convert_i64(&mut df, name)?;
    }

    for (source, seconds_name) in [
        ("Duration", "Duration_Seconds"),
        ("Avg_Watch_Time", "Avg_Watch_Seconds"),
    ] {
        let seconds: Vec<i64> = if has_column(&df, source) {
            str_values(&df, source)?
                .iter()
                .map(|v| parse_duration(v))
                .collect()
        } else {
            vec![0; df.height()]
        };
        df.with_column(Series::new(seconds_name.into(), seconds))?;
    }
    stamp_platform(&mut df, Platform::ShortVideo)?;

    Ok(CleanShortVideoLive::new(df))
}

/// Clean short-video per-video records and derive the engagement rate.
pub fn clean_short_video_video(raw: DataFrame) -> Result<CleanShortVideoVideo> {
    let mut df = raw;

    for name in ["GMV", "GPM", "Video_Sales_GMV", "Avg_Order_Value", "Commission", "Fixed_Fee", "Refund_GMV"] {
        convert_f64(&mut df, name, parse_currency)?;
    }
    for name in [
        "Video_CTR",
        "V_to_L_Rate",
        "Completion_Rate",
        "Conversion_Rate",
        "CTR",
    ] {
        convert_f64(&mut df, name, parse_percentage)?;
    }
    for name in [
        "Views",
        "Likes",
        "Comments",
        "Shares",
        "New_Followers",
        "V_to_L_Clicks",
        "Product_Impressions",
        "Product_Clicks",
        "Unique_Customers",
        "Orders",
        "Items_Sold",
        "Refund_Items",
    ] {
        convert_i64(&mut df, name)?;
    }

    let views = df.column("Views")?.i64()?.into_no_null_iter().collect::<Vec<i64>>();
    let likes = df.column("Likes")?.i64()?.into_no_null_iter().collect::<Vec<i64>>();
    let comments = df.column("Comments")?.i64()?.into_no_null_iter().collect::<Vec<i64>>();
    let shares = df.column("Shares")?.i64()?.into_no_null_iter().collect::<Vec<i64>>();
    let engagement: Vec<Option<f64>> = (0..df.height())
        .map(|i| {
            (views[i] != 0)
                .then(|| (likes[i] + comments[i] + shares[i]) as f64 / views[i] as f64)
        })
        .collect();
    df.with_column(Series::new("Engagement_Rate".into(), engagement))?;
    stamp_platform(&mut df, Platform::ShortVideo)?;

    Ok(CleanShortVideoVideo::new(df))
}
