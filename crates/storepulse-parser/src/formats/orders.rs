use crate::columns::{map_header, ORDER_COLUMNS};
use crate::errors::ParserError;
use crate::model::RawTable;
use crate::registry::SourceParser;

use super::{build_raw_frame, read_first_sheet, stamp_provenance};

/// Marketplace order workbook: one header row, one record per order line.
/// The order date is a per-record field, so nothing is derived from the
/// file name here.
pub struct OrdersParser;

impl OrdersParser {
    const NAME: &'static str = "MARKETPLACE_ORDERS";
}

impl SourceParser for OrdersParser {
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
            .filter_map(|(idx, name)| map_header(ORDER_COLUMNS, name).map(|c| (idx, c)))
            .collect();
        if mapped.is_empty() {
            return Err(ParserError::UnmappedSchema {
                parser: Self::NAME,
                file: file_name.to_string(),
            });
        }

        let data: Vec<Vec<String>> = data
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
