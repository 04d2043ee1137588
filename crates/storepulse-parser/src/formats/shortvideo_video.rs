use crate::columns::{map_header, SHORT_VIDEO_VIDEO_ALT_COLUMNS, SHORT_VIDEO_VIDEO_COLUMNS};
use crate::errors::ParserError;
use crate::model::RawTable;
use crate::registry::SourceParser;

use super::{
    build_raw_frame, extract_date_range, extract_iso_date, read_first_sheet, stamp_provenance,
};

/// Short-video performance workbook: date-range banner on row 0, headers
/// on row 2, one record per video. The date is optional for this shape;
/// videos carry their own post time.
pub struct ShortVideoPerformanceParser;

impl ShortVideoPerformanceParser {
    const NAME: &'static str = "SHORT_VIDEO_PERFORMANCE";
}

impl SourceParser for ShortVideoPerformanceParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, file_name: &str, contents: &[u8]) -> Result<RawTable, ParserError> {
        let rows = read_first_sheet(Self::NAME, contents)?;
        if rows.len() < 4 {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "expected banner row, header row and at least one data row".to_string(),
            });
        }

        let first_cell = rows[0].first().map(String::as_str).unwrap_or("");
        if first_cell.contains("ชื่อวิดีโอ") {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "headers on the first row, this is the video list layout".to_string(),
            });
        }

        let report_date = extract_date_range(first_cell)
            .map(|(_, end)| end)
            .or_else(|| extract_iso_date(file_name));

        let header = &rows[2];
        let mapped: Vec<(usize, &'static str)> = header
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| map_header(SHORT_VIDEO_VIDEO_COLUMNS, name).map(|c| (idx, c)))
            .collect();
        if mapped.is_empty() {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "no performance headers found on row 2".to_string(),
            });
        }

        let data: Vec<Vec<String>> = rows[3..]
            .iter()
            .filter(|row| row.iter().any(|value| !value.is_empty()))
            .cloned()
            .collect();

        let mut df = build_raw_frame(Self::NAME, &mapped, &data)?;
        stamp_provenance(Self::NAME, &mut df, file_name, report_date)?;

        Ok(RawTable {
            df,
            source_file: file_name.to_string(),
        })
    }
}

/// Alternate short-video workbook: a plain video list with headers on
/// row 0 and no banner. Seen in affiliate exports from the same platform.
pub struct ShortVideoListParser;

impl ShortVideoListParser {
    const NAME: &'static str = "SHORT_VIDEO_LIST";
}

impl SourceParser for ShortVideoListParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, file_name: &str, contents: &[u8]) -> Result<RawTable, ParserError> {
        let rows = read_first_sheet(Self::NAME, contents)?;
        let (header, data) = rows
            .split_first()
            .ok_or(ParserError::EmptyData { parser: Self::NAME })?;

        let mapped: Vec<(usize, &'static str)> = header
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                map_header(SHORT_VIDEO_VIDEO_ALT_COLUMNS, name).map(|c| (idx, c))
            })
            .collect();
        if mapped.is_empty() {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "no video list headers found on the first row".to_string(),
            });
        }

        let data: Vec<Vec<String>> = data
            .iter()
            .filter(|row| row.iter().any(|value| !value.is_empty()))
            .cloned()
            .collect();

        let mut df = build_raw_frame(Self::NAME, &mapped, &data)?;
        stamp_provenance(Self::NAME, &mut df, file_name, extract_iso_date(file_name))?;

        Ok(RawTable {
            df,
            source_file: file_name.to_string(),
        })
    }
}
