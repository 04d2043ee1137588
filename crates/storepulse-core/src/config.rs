use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Source directories, one per export category.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDirs {
    pub orders: PathBuf,
    pub ads: PathBuf,
    pub live: PathBuf,
    pub video: PathBuf,
    pub short_video_live: PathBuf,
    pub short_video_video: PathBuf,
}

/// Tunable cut-offs for the master-table segmentations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Daily GMV at or above this quantile is a "High" day.
    pub gmv_top_quantile: f64,
    /// Daily GMV at or below this quantile is a "Low" day.
    pub gmv_bottom_quantile: f64,
    /// AOV within +/- this fraction of the mean is "Mid".
    pub aov_band: f64,
    pub roas_excellent: f64,
    pub roas_good: f64,
    pub roas_breakeven: f64,
    /// Zero-order campaigns with more clicks than this are flagged.
    pub bleeding_min_clicks: i64,
    /// Top product above this share of GMV means over-reliance.
    pub hero_reliance_pct: f64,
    /// Top-5 share below this means the catalog needs a push.
    pub core_push_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            gmv_top_quantile: 0.8,
            gmv_bottom_quantile: 0.2,
            aov_band: 0.2,
            roas_excellent: 5.0,
            roas_good: 3.0,
            roas_breakeven: 1.0,
            bleeding_min_clicks: 100,
            hero_reliance_pct: 60.0,
            core_push_pct: 25.0,
        }
    }
}

/// Full pipeline configuration. Everything the stages need is carried here
/// and passed down; no stage reads globals or the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub source_dirs: SourceDirs,
    pub output_dir: PathBuf,
    /// DuckDB database file, created or replaced under `output_dir` when
    /// relative.
    #[serde(default = "default_db_file")]
    pub db_file: PathBuf,
    /// Order statuses that count as real sales.
    #[serde(default = "default_valid_statuses")]
    pub valid_statuses: Vec<String>,
    /// Case-insensitive substrings that exclude a product line.
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,
    #[serde(default)]
    pub thresholds: Thresholds,
}

fn default_db_file() -> PathBuf {
    PathBuf::from("dashboard.duckdb")
}

fn default_valid_statuses() -> Vec<String> {
    [
        "สำเร็จแล้ว",
        "ที่ต้องจัดส่ง",
        "กำลังจัดส่ง",
        "รอการชำระเงิน",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_keywords() -> Vec<String> {
    [
        "iphone", "ipad", "apple", "samsung", "phone", "case", "cable", "charger", "headphone",
        "earphone", "laptop", "computer",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl PipelineConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Absolute path of the DuckDB file, resolved against `output_dir`.
    pub fn db_path(&self) -> PathBuf {
        if self.db_file.is_absolute() {
            self.db_file.clone()
        } else {
            self.output_dir.join(&self.db_file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let raw = r#"
            output_dir = "/tmp/out"

            [source_dirs]
            orders = "/data/orders"
            ads = "/data/ads"
            live = "/data/live"
            video = "/data/video"
            short_video_live = "/data/sv-live"
            short_video_video = "/data/sv-video"
        "#;
        let config: PipelineConfig = toml::from_str(raw).expect("config parse");
        assert_eq!(config.valid_statuses.len(), 4);
        assert!(config.exclude_keywords.contains(&"iphone".to_string()));
        assert_eq!(config.thresholds.roas_good, 3.0);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/out/dashboard.duckdb"));
    }

    #[test]
    fn threshold_overrides_apply() {
        let raw = r#"
            output_dir = "/tmp/out"

            [source_dirs]
            orders = "/data/orders"
            ads = "/data/ads"
            live = "/data/live"
            video = "/data/video"
            short_video_live = "/data/sv-live"
            short_video_video = "/data/sv-video"

            [thresholds]
            roas_excellent = 6.5
        "#;
        let config: PipelineConfig = toml::from_str(raw).expect("config parse");
        assert_eq!(config.thresholds.roas_excellent, 6.5);
        // untouched fields keep their defaults
        assert_eq!(config.thresholds.bleeding_min_clicks, 100);
    }
}
