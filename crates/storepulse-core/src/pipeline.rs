//! End-to-end batch run: load and clean every category, aggregate the
//! masters, export the flat files and rebuild the DuckDB store.
//!
//! Categories are isolated from each other. When one fails (an export
//! format changed, say), the failure is logged and recorded in the run
//! summary, the masters derived from it are skipped, and everything else
//! still refreshes.

use polars::prelude::DataFrame;
use serde::Serialize;
use storepulse_parser::SourceCategory;

use crate::cleaning::{
    clean_ads, clean_live, clean_orders, clean_short_video_live, clean_short_video_video,
    clean_video,
};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::exports::{self, export_csv};
use crate::ingestion::{load_category, LoadReport};
use crate::masters::{
    build_ads_performance, build_daily_geographic, build_daily_sales, build_geographic,
    build_product_sales,
};
use crate::store::DashboardStore;
use crate::types::{
    CleanAds, CleanLive, CleanOrders, CleanShortVideoLive, CleanShortVideoVideo, CleanVideo,
};

/// Cleaned-order columns mirrored into the `orders_raw` dashboard table.
const ORDERS_RAW_COLUMNS: &[&str] = &[
    "Order_ID",
    "Date",
    "Order_Status",
    "Product_Name",
    "SKU",
    "Quantity",
    "Net_Sales",
    "True_Net_Revenue",
    "Total_Fees",
    "Total_Discount",
    "Province",
    "Platform",
];

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub category: &'static str,
    pub rows: usize,
    pub files: Vec<LoadReport>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub categories: Vec<CategorySummary>,
    pub exports: Vec<String>,
    pub skipped_masters: Vec<&'static str>,
}

/// Load and clean one category, recording any failure instead of
/// propagating it.
fn stage<T>(
    dir: &std::path::Path,
    category: SourceCategory,
    clean: impl FnOnce(DataFrame) -> Result<T>,
    summaries: &mut Vec<CategorySummary>,
) -> Option<T> {
    let outcome = load_category(dir, category).and_then(|load| {
        let reports = load.reports;
        match load.df {
            Some(df) => {
                let rows = df.height();
                clean(df).map(|clean| (Some(clean), rows, reports))
            }
            None => Ok((None, 0, reports)),
        }
    });

    match outcome {
        Ok((clean, rows, files)) => {
            summaries.push(CategorySummary {
                category: category.as_str(),
                rows,
                files,
                error: None,
            });
            clean
        }
        Err(err) => {
            tracing::error!(
                category = category.as_str(),
                error = %err,
                "category failed, continuing without it"
            );
            summaries.push(CategorySummary {
                category: category.as_str(),
                rows: 0,
                files: Vec::new(),
                error: Some(err.to_string()),
            });
            None
        }
    }
}

pub fn run_pipeline(config: &PipelineConfig) -> Result<RunSummary> {
    let mut categories = Vec::new();

    let orders: Option<CleanOrders> = stage(
        &config.source_dirs.orders,
        SourceCategory::Orders,
        |df| clean_orders(df, config),
        &mut categories,
    );
    let ads: Option<CleanAds> = stage(
        &config.source_dirs.ads,
        SourceCategory::Ads,
        clean_ads,
        &mut categories,
    );
    let live: Option<CleanLive> = stage(
        &config.source_dirs.live,
        SourceCategory::Live,
        clean_live,
        &mut categories,
    );
    let video: Option<CleanVideo> = stage(
        &config.source_dirs.video,
        SourceCategory::Video,
        clean_video,
        &mut categories,
    );
    let sv_live: Option<CleanShortVideoLive> = stage(
        &config.source_dirs.short_video_live,
        SourceCategory::ShortVideoLive,
        clean_short_video_live,
        &mut categories,
    );
    let sv_video: Option<CleanShortVideoVideo> = stage(
        &config.source_dirs.short_video_video,
        SourceCategory::ShortVideoVideo,
        clean_short_video_video,
        &mut categories,
    );

    let mut exports_written: Vec<(Option<&'static str>, String, std::path::PathBuf)> = Vec::new();
    let mut skipped_masters: Vec<&'static str> = Vec::new();
    let out = &config.output_dir;

    let write = |table: Option<&'static str>,
                     file_name: &str,
                     df: &DataFrame,
                     exports_written: &mut Vec<(Option<&'static str>, String, std::path::PathBuf)>|
     -> Result<()> {
        let path = export_csv(df, out, file_name)?;
        exports_written.push((table, file_name.to_string(), path));
        Ok(())
    };

    if let Some(orders) = &orders {
        let daily = build_daily_sales(orders, &config.thresholds)?;
        let products = build_product_sales(orders, &config.thresholds)?;
        let geographic = build_geographic(orders)?;
        let daily_geographic = build_daily_geographic(orders)?;

        write(
            Some("daily_sales"),
            exports::MASTER_DAILY_SALES,
            &daily,
            &mut exports_written,
        )?;
        write(
            Some("products"),
            exports::MASTER_PRODUCT_SALES,
            &products,
            &mut exports_written,
        )?;
        write(
            Some("geographic"),
            exports::MASTER_GEOGRAPHIC,
            &geographic,
            &mut exports_written,
        )?;
        write(
            Some("daily_geographic"),
            exports::DAILY_GEOGRAPHIC,
            &daily_geographic,
            &mut exports_written,
        )?;

        let raw_columns: Vec<&str> = ORDERS_RAW_COLUMNS
            .iter()
            .copied()
            .filter(|name| orders.frame().column(name).is_ok())
            .collect();
        let orders_raw = orders.frame().select(raw_columns)?;
        write(
            Some("orders_raw"),
            exports::COMBINED_ORDERS,
            &orders_raw,
            &mut exports_written,
        )?;
    } else {
        skipped_masters.extend([
            "daily_sales",
            "products",
            "geographic",
            "daily_geographic",
            "orders_raw",
        ]);
    }

    if let Some(ads) = &ads {
        let master = build_ads_performance(ads, &config.thresholds)?;
        write(
            Some("ads_performance"),
            exports::MASTER_ADS_PERFORMANCE,
            &master,
            &mut exports_written,
        )?;
        write(None, exports::COMBINED_ADS, ads.frame(), &mut exports_written)?;
    } else {
        skipped_masters.push("ads_performance");
    }

    if let Some(live) = &live {
        write(
            Some("combined_live"),
            exports::COMBINED_LIVE,
            live.frame(),
            &mut exports_written,
        )?;
    }
    if let Some(video) = &video {
        write(
            Some("combined_video"),
            exports::COMBINED_VIDEO,
            video.frame(),
            &mut exports_written,
        )?;
    }
    if let Some(sv_live) = &sv_live {
        write(
            Some("short_video_live"),
            exports::SHORT_VIDEO_LIVE,
            sv_live.frame(),
            &mut exports_written,
        )?;
    }
    if let Some(sv_video) = &sv_video {
        write(
            Some("short_video_video"),
            exports::SHORT_VIDEO_VIDEO,
            sv_video.frame(),
            &mut exports_written,
        )?;
    }

    let store = DashboardStore::open(&config.db_path())?;
    for (table, _, path) in &exports_written {
        if let Some(table) = table {
            store.replace_from_csv(table, path)?;
        }
    }
    store.create_views()?;

    let summary = RunSummary {
        categories,
        exports: exports_written
            .iter()
            .map(|(_, file_name, _)| file_name.clone())
            .collect(),
        skipped_masters,
    };
    tracing::info!(
        exports = summary.exports.len(),
        skipped = summary.skipped_masters.len(),
        "pipeline run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceDirs, Thresholds};
    use std::fs;
    use std::path::Path;

    fn config_for(root: &Path) -> PipelineConfig {
        let dir = |name: &str| {
            let path = root.join(name);
            fs::create_dir_all(&path).expect("mkdir");
            path
        };
        PipelineConfig {
            source_dirs: SourceDirs {
                orders: dir("orders"),
                ads: dir("ads"),
                live: dir("live"),
                video: dir("video"),
                short_video_live: dir("sv-live"),
                short_video_video: dir("sv-video"),
            },
            output_dir: dir("output"),
            db_file: "dashboard.duckdb".into(),
            valid_statuses: vec!["สำเร็จแล้ว".to_string()],
            exclude_keywords: vec![],
            thresholds: Thresholds::default(),
        }
    }

    fn ads_export() -> &'static str {
        "\
ชื่อร้านค้า,My Store,,,,,,,,,,,,,
,,,,,,,,,,,,,,
ลำดับ,ชื่อโฆษณา,สถานะ,ประเภทโฆษณา,การมองเห็น,จำนวนคลิก,การสั่งซื้อ,ยอดขาย,ค่าโฆษณา,,,,,,
1,Campaign A,Running,Search,10000,250,12,\"฿5,400.00\",\"฿1,200.00\",,,,,,
"
    }

    #[test]
    fn empty_sources_still_produce_a_summary() {
        let root = tempfile::tempdir().expect("tempdir");
        let summary = run_pipeline(&config_for(root.path())).expect("run");

        assert_eq!(summary.categories.len(), 6);
        assert!(summary.exports.is_empty());
        assert!(summary.skipped_masters.contains(&"daily_sales"));
    }

    #[test]
    fn ads_category_runs_even_when_orders_are_missing() {
        let root = tempfile::tempdir().expect("tempdir");
        let config = config_for(root.path());
        fs::write(config.source_dirs.ads.join("ads.csv"), ads_export()).expect("write");

        let summary = run_pipeline(&config).expect("run");

        assert!(summary
            .exports
            .contains(&exports::MASTER_ADS_PERFORMANCE.to_string()));
        assert!(summary.skipped_masters.contains(&"daily_sales"));
        assert!(!summary.skipped_masters.contains(&"ads_performance"));

        let store = DashboardStore::open(&config.db_path()).expect("open db");
        let rows = store
            .query("SELECT COUNT(*) AS n FROM ads_performance")
            .expect("query");
        assert_eq!(rows[0]["n"], serde_json::json!(1));
    }

    #[test]
    fn reruns_on_identical_inputs_are_byte_identical() {
        // two campaigns with tied sales exercise the tie-break ordering
        let ads_with_tie = "\
ลำดับ,ชื่อโฆษณา,สถานะ,ประเภทโฆษณา,การมองเห็น,จำนวนคลิก,การสั่งซื้อ,ยอดขาย,ค่าโฆษณา
1,Campaign B,Running,Search,10000,250,12,\"฿5,400.00\",\"฿1,200.00\"
2,Campaign A,Running,Search,8000,200,10,\"฿5,400.00\",\"฿1,000.00\"
";
        let run_once = || {
            let root = tempfile::tempdir().expect("tempdir");
            let config = config_for(root.path());
            fs::write(config.source_dirs.ads.join("ads.csv"), ads_with_tie).expect("write");
            run_pipeline(&config).expect("run");
            fs::read(config.output_dir.join(exports::MASTER_ADS_PERFORMANCE)).expect("read export")
        };

        assert_eq!(run_once(), run_once());
    }

    #[test]
    fn a_failing_category_does_not_stop_the_others() {
        let root = tempfile::tempdir().expect("tempdir");
        let config = config_for(root.path());
        fs::write(config.source_dirs.ads.join("ads.csv"), ads_export()).expect("write");
        // live export whose schema matches nothing
        fs::write(
            config.source_dirs.live.join("live_2026-01-31.csv"),
            "x,y\na,b\nc,d\n",
        )
        .expect("write");

        let summary = run_pipeline(&config).expect("run");

        let live = summary
            .categories
            .iter()
            .find(|c| c.category == "live")
            .expect("live summary");
        assert!(live.error.is_some());
        assert!(summary
            .exports
            .contains(&exports::MASTER_ADS_PERFORMANCE.to_string()));
    }
}
