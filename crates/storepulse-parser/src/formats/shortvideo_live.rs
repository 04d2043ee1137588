use crate::columns::{map_header, SHORT_VIDEO_LIVE_COLUMNS};
use crate::errors::ParserError;
use crate::model::RawTable;
use crate::registry::SourceParser;

use super::{
    build_raw_frame, extract_date_range, extract_iso_date, read_first_sheet, stamp_provenance,
};

/// Short-video live session workbook. Row 0 is a date-range banner
/// (`ช่วงวันที่: YYYY-MM-DD ~ YYYY-MM-DD`), row 1 is blank, row 2 carries
/// the column headers, data starts at row 3. The report date is the banner
/// range end, falling back to an ISO substring in the file name.
pub struct ShortVideoLiveParser;

impl ShortVideoLiveParser {
    const NAME: &'static str = "SHORT_VIDEO_LIVE";
}

impl SourceParser for ShortVideoLiveParser {
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

        let banner = rows[0].first().map(String::as_str).unwrap_or("");
        let report_date = extract_date_range(banner)
            .map(|(_, end)| end)
            .or_else(|| extract_iso_date(file_name))
            .ok_or_else(|| ParserError::MissingFilenameDate {
                parser: Self::NAME,
                file: file_name.to_string(),
            })?;

        let header = &rows[2];
        let mapped: Vec<(usize, &'static str)> = header
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| map_header(SHORT_VIDEO_LIVE_COLUMNS, name).map(|c| (idx, c)))
            .collect();
        if mapped.is_empty() {
            return Err(ParserError::UnmappedSchema {
                parser: Self::NAME,
                file: file_name.to_string(),
            });
        }

        let data: Vec<Vec<String>> = rows[3..]
            .iter()
            .filter(|row| row.iter().any(|value| !value.is_empty()))
            .cloned()
            .collect();

        let mut df = build_raw_frame(Self::NAME, &mapped, &data)?;
        stamp_provenance(Self::NAME, &mut df, file_name, Some(report_date))?;

        Ok(RawTable {
            df,
            source_file: file_name.to_string(),
        })
    }
}
