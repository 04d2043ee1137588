use crate::columns::{map_header, ADS_COLUMNS};
use crate::errors::ParserError;
use crate::model::RawTable;
use crate::registry::SourceParser;

use super::{build_raw_frame, read_csv_rows, stamp_provenance};

/// Sequence-number column that opens the real header row, below the
/// free-form preamble block the ads report starts with.
const HEADER_SENTINEL: &str = "ลำดับ";

/// Marketplace ads report: a few preamble rows (export metadata, date
/// range), then the header row, then one record per ad. Ads carry no
/// per-record date; aggregation is campaign-level only.
pub struct AdsParser;

impl AdsParser {
    const NAME: &'static str = "MARKETPLACE_ADS";
}

impl SourceParser for AdsParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, file_name: &str, contents: &[u8]) -> Result<RawTable, ParserError> {
        let rows = read_csv_rows(Self::NAME, contents)?;

        let header_idx = rows
            .iter()
            .position(|row| {
                row.first()
                    .map(|field| field.starts_with(HEADER_SENTINEL))
                    .unwrap_or(false)
            })
            .ok_or_else(|| ParserError::InvalidHeader {
                parser: Self::NAME,
                row_index: 0,
                message: format!("no row starting with '{HEADER_SENTINEL}' found"),
            })?;

        let header = &rows[header_idx];
        let mapped: Vec<(usize, &'static str)> = header
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| map_header(ADS_COLUMNS, name).map(|c| (idx, c)))
            .collect();
        if mapped.is_empty() {
            return Err(ParserError::UnmappedSchema {
                parser: Self::NAME,
                file: file_name.to_string(),
            });
        }

        let data: Vec<Vec<String>> = rows[header_idx + 1..]
            .iter()
            .filter(|row| row.iter().any(|value| !value.is_empty()))
            .cloned()
            .collect();

        let mut df = build_raw_frame(Self::NAME, &mapped, &data)?;
        stamp_provenance(Self::NAME, &mut df, file_name, None)?;

        Ok(RawTable {
            df,
            source_file: file_name.to_string(),
        })
    }
}
