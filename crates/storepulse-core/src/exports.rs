//! Flat CSV exports. Every file is rewritten in full on each run; the
//! DuckDB store rebuilds its tables from these files afterwards.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::error::Result;

pub const MASTER_DAILY_SALES: &str = "Master_Daily_Sales.csv";
pub const MASTER_PRODUCT_SALES: &str = "Master_Product_Sales.csv";
pub const MASTER_ADS_PERFORMANCE: &str = "Master_Ads_Performance.csv";
pub const MASTER_GEOGRAPHIC: &str = "Master_Geographic.csv";
pub const DAILY_GEOGRAPHIC: &str = "Daily_Geographic.csv";
pub const COMBINED_ORDERS: &str = "Combined_Orders.csv";
pub const COMBINED_ADS: &str = "Combined_Ads.csv";
pub const COMBINED_LIVE: &str = "Combined_Live.csv";
pub const COMBINED_VIDEO: &str = "Combined_Video.csv";
pub const SHORT_VIDEO_LIVE: &str = "Short_Video_Live.csv";
pub const SHORT_VIDEO_VIDEO: &str = "Short_Video_Video.csv";

/// Write one table under the output directory, overwriting any previous run.
pub fn export_csv(df: &DataFrame, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df.clone())?;
    tracing::debug!(file = %path.display(), rows = df.height(), "wrote export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Date".into(), vec!["2026-01-01", "2026-01-02"]).into_column(),
            Series::new("GMV".into(), vec![100.5, 250.0]).into_column(),
        ])
        .expect("frame")
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = export_csv(&sample_frame(), dir.path(), MASTER_DAILY_SALES).expect("export");

        let written = std::fs::read_to_string(path).expect("read back");
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("Date,GMV"));
        assert_eq!(lines.next(), Some("2026-01-01,100.5"));
    }

    #[test]
    fn overwrites_a_previous_export() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(MASTER_DAILY_SALES);
        std::fs::write(&path, "stale contents from an older run\n").expect("seed");

        export_csv(&sample_frame(), dir.path(), MASTER_DAILY_SALES).expect("export");

        let written = std::fs::read_to_string(path).expect("read back");
        assert!(written.starts_with("Date,GMV"));
        assert!(!written.contains("stale"));
    }
}
