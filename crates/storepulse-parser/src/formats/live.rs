use crate::columns::{match_metric, LIVE_METRIC_PATTERNS};
use crate::errors::ParserError;
use crate::model::RawTable;
use crate::registry::SourceParser;

use super::{
    build_raw_frame, combine_two_row_headers, extract_iso_date, read_csv_rows, stamp_provenance,
};

/// Live-streaming overview export: two stacked header rows followed by a
/// single summary data row. The export carries no per-record date, so the
/// report date must come from an ISO substring in the file name; a file
/// without one is rejected rather than silently dated "today".
pub struct LiveOverviewParser;

impl LiveOverviewParser {
    const NAME: &'static str = "MARKETPLACE_LIVE";
}

impl SourceParser for LiveOverviewParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, file_name: &str, contents: &[u8]) -> Result<RawTable, ParserError> {
        let report_date =
            extract_iso_date(file_name).ok_or_else(|| ParserError::MissingFilenameDate {
                parser: Self::NAME,
                file: file_name.to_string(),
            })?;

        let rows = read_csv_rows(Self::NAME, contents)?;
        if rows.len() < 3 {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "expected two header rows and a summary data row".to_string(),
            });
        }

        let combined = combine_two_row_headers(&rows[0], &rows[1]);
        let mapped: Vec<(usize, &'static str)> = combined
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| match_metric(LIVE_METRIC_PATTERNS, name).map(|c| (idx, c)))
            .collect();
        if mapped.is_empty() {
            return Err(ParserError::UnmappedSchema {
                parser: Self::NAME,
                file: file_name.to_string(),
            });
        }

        let data = vec![rows[2].clone()];
        let mut df = build_raw_frame(Self::NAME, &mapped, &data)?;
        stamp_provenance(Self::NAME, &mut df, file_name, Some(report_date))?;

        Ok(RawTable {
            df,
            source_file: file_name.to_string(),
        })
    }
}
