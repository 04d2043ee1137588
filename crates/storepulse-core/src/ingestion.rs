use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::Serialize;
use storepulse_parser::{parse_source_file, ParserError, SourceCategory};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Loaded,
    Skipped,
    Failed,
}

/// Outcome of one source file, kept for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub path: String,
    pub status: FileStatus,
    pub message: String,
}

/// All files of one category, normalized and stacked into a single frame.
#[derive(Debug)]
pub struct CategoryLoad {
    pub category: SourceCategory,
    /// `None` when no file in the directory produced rows.
    pub df: Option<DataFrame>,
    pub reports: Vec<LoadReport>,
}

impl CategoryLoad {
    pub fn loaded_files(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.status == FileStatus::Loaded)
            .count()
    }
}

/// Enumerate the category's source files, sorted for deterministic output.
fn discover_files(dir: &Path, category: SourceCategory) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.{}", dir.display(), category.extension());
    let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            // exports synced from shared drives drag metadata files along
            !path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with('.'))
                .unwrap_or(true)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Load every file of one category from its directory.
///
/// A file whose name lacks the required date is skipped with a warning so
/// one mislabeled export cannot poison the whole category. A file whose
/// columns match nothing in the expected schema is a hard error: that means
/// the export format changed and silently dropping it would corrupt every
/// downstream number.
pub fn load_category(dir: &Path, category: SourceCategory) -> Result<CategoryLoad> {
    let paths = discover_files(dir, category)?;
    let mut frames: Vec<LazyFrame> = Vec::new();
    let mut reports = Vec::new();

    for path in &paths {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = std::fs::read(path)?;

        match parse_source_file(category, &file_name, &contents) {
            Ok(raw) => {
                tracing::debug!(
                    category = category.as_str(),
                    file = %file_name,
                    rows = raw.df.height(),
                    "loaded source file"
                );
                reports.push(LoadReport {
                    path: path.display().to_string(),
                    status: FileStatus::Loaded,
                    message: format!("{} rows", raw.df.height()),
                });
                frames.push(raw.df.lazy());
            }
            Err(ParserError::MissingFilenameDate { .. }) => {
                tracing::warn!(
                    category = category.as_str(),
                    file = %file_name,
                    "file name carries no date, skipping"
                );
                reports.push(LoadReport {
                    path: path.display().to_string(),
                    status: FileStatus::Skipped,
                    message: "file name carries no ISO date".to_string(),
                });
            }
            Err(ParserError::EmptyData { .. }) => {
                reports.push(LoadReport {
                    path: path.display().to_string(),
                    status: FileStatus::Skipped,
                    message: "no data rows".to_string(),
                });
            }
            Err(err) => return Err(PipelineError::Parser(err)),
        }
    }

    let df = if frames.is_empty() {
        None
    } else {
        Some(
            concat_lf_diagonal(&frames, UnionArgs::default())?
                .collect()?,
        )
    };

    Ok(CategoryLoad {
        category,
        df,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_and_stacks_a_directory_of_csv_exports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let export = "\
ภาพรวม,,,ยอดขาย,
ระยะเวลาเก็บข้อมูล,จำนวน Live ทั้งหมด,ผู้ชมทั้งหมด,ยอดขาย(คำสั่งซื้อที่เกิดขึ้น),PCU
2026-01-30,2,500,\"฿8,000.00\",90
";
        fs::write(dir.path().join("live_2026-01-30.csv"), export).expect("write");
        fs::write(
            dir.path().join("live_2026-01-31.csv"),
            export.replace("2026-01-30", "2026-01-31"),
        )
        .expect("write");
        // no date in the name: skipped, not fatal
        fs::write(dir.path().join("live_undated.csv"), export).expect("write");

        let load = load_category(dir.path(), SourceCategory::Live).expect("load");
        assert_eq!(load.loaded_files(), 2);
        assert!(load
            .reports
            .iter()
            .any(|r| r.status == FileStatus::Skipped));
        let df = load.df.expect("frame");
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn unmapped_schema_fails_the_category() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("ads.csv"),
            "ลำดับ,unknown_a,unknown_b\n1,x,y\n",
        )
        .expect("write");

        let err = load_category(dir.path(), SourceCategory::Ads).expect_err("must fail");
        assert!(matches!(
            err,
            PipelineError::Parser(ParserError::UnmappedSchema { .. })
        ));
    }

    #[test]
    fn concatenation_ignores_file_creation_order() {
        let export_for = |date: &str, viewers: &str| {
            format!(
                "ภาพรวม,,\nระยะเวลาเก็บข้อมูล,ผู้ชมทั้งหมด,PCU\n{date},{viewers},10\n"
            )
        };
        let load_from = |later_first: bool| {
            let dir = tempfile::tempdir().expect("tempdir");
            let a = ("live_2026-01-01.csv", export_for("2026-01-01", "100"));
            let b = ("live_2026-01-02.csv", export_for("2026-01-02", "200"));
            let ordered = if later_first { [&b, &a] } else { [&a, &b] };
            for (name, body) in ordered {
                fs::write(dir.path().join(name), body).expect("write");
            }
            load_category(dir.path(), SourceCategory::Live)
                .expect("load")
                .df
                .expect("frame")
        };

        let forward = load_from(false);
        let reversed = load_from(true);
        assert!(forward.equals_missing(&reversed));
    }

    #[test]
    fn empty_directory_yields_no_frame() {
        let dir = tempfile::tempdir().expect("tempdir");
        let load = load_category(dir.path(), SourceCategory::Orders).expect("load");
        assert!(load.df.is_none());
        assert!(load.reports.is_empty());
    }
}
