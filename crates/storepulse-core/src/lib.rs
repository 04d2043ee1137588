pub mod cleaning;
pub mod config;
pub mod error;
pub mod exports;
pub mod ingestion;
pub mod masters;
pub mod pipeline;
pub mod store;
pub mod types;

pub use config::{PipelineConfig, SourceDirs, Thresholds};
pub use error::{PipelineError, Result};
pub use pipeline::{run_pipeline, RunSummary};
pub use store::DashboardStore;
