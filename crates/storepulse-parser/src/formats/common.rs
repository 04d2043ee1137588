use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

use crate::errors::ParserError;
use crate::model::{FILE_SOURCE, REPORT_DATE};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("iso date regex"));
static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})\s*~\s*(\d{4}-\d{2}-\d{2})").expect("date range regex")
});

/// Pull the first ISO-format date substring out of a file name.
pub(crate) fn extract_iso_date(name: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE_RE.captures(name)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a `YYYY-MM-DD ~ YYYY-MM-DD` banner into (start, end).
pub(crate) fn extract_date_range(text: &str) -> Option<(NaiveDate, NaiveDate)> {
    let caps = DATE_RANGE_RE.captures(text)?;
    let start = NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(caps.get(2)?.as_str(), "%Y-%m-%d").ok()?;
    Some((start, end))
}

/// Combine the two stacked header rows of the overview exports.
///
/// The top row carries a section label that applies to every following
/// column until the next label; the bottom row carries the metric name.
pub(crate) fn combine_two_row_headers(top: &[String], bottom: &[String]) -> Vec<String> {
    let mut combined = Vec::with_capacity(bottom.len());
    let mut current = String::new();
    for (idx, sub) in bottom.iter().enumerate() {
        if let Some(section) = top.get(idx) {
            if !section.is_empty() {
                current = section.clone();
            }
        }
        if sub.is_empty() {
            combined.push(current.clone());
        } else {
            combined.push(format!("{current}_{sub}"));
        }
    }
    combined
}

/// Render a workbook cell as text. Numbers lose no precision; whole floats
/// drop the trailing `.0` the way the source exports show them.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => String::new(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Read the first worksheet of an xlsx export into string rows.
pub(crate) fn read_first_sheet(
    parser: &'static str,
    contents: &[u8],
) -> Result<Vec<Vec<String>>, ParserError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents.to_vec()))
        .map_err(|source| ParserError::Workbook { parser, source })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParserError::EmptyData { parser })?
        .map_err(|source| ParserError::Workbook { parser, source })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Read a delimited export into string rows, tolerating ragged widths.
pub(crate) fn read_csv_rows(
    parser: &'static str,
    contents: &[u8],
) -> Result<Vec<Vec<String>>, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ParserError::Csv { parser, source })?;
        rows.push(record.iter().map(|field| field.trim().to_string()).collect());
    }
    Ok(rows)
}

/// Build an all-string DataFrame from mapped columns of the data rows.
///
/// `mapped` pairs a source column index with its canonical name; a canonical
/// name that appears twice keeps only its first source column.
pub(crate) fn build_raw_frame(
    parser: &'static str,
    mapped: &[(usize, &'static str)],
    rows: &[Vec<String>],
) -> Result<DataFrame, ParserError> {
    if rows.is_empty() {
        return Err(ParserError::EmptyData { parser });
    }

    let mut columns: Vec<Column> = Vec::with_capacity(mapped.len());
    let mut seen: Vec<&'static str> = Vec::with_capacity(mapped.len());
    for (source_idx, canonical) in mapped {
        if seen.contains(canonical) {
            continue;
        }
        seen.push(canonical);
        let values: Vec<String> = rows
            .iter()
            .map(|row| row.get(*source_idx).cloned().unwrap_or_default())
            .collect();
        columns.push(Series::new((*canonical).into(), values).into_column());
    }

    DataFrame::new(columns).map_err(|source| ParserError::Frame { parser, source })
}

/// Stamp a constant provenance/date column onto a raw frame.
pub(crate) fn with_constant_column(
    parser: &'static str,
    df: &mut DataFrame,
    name: &str,
    value: &str,
) -> Result<(), ParserError> {
    let height = df.height();
    let series = Series::new(name.into(), vec![value.to_string(); height]);
    df.with_column(series)
        .map_err(|source| ParserError::Frame { parser, source })?;
    Ok(())
}

/// Stamp the standard `File_Source` and optional `Report_Date` columns.
pub(crate) fn stamp_provenance(
    parser: &'static str,
    df: &mut DataFrame,
    file_name: &str,
    report_date: Option<NaiveDate>,
) -> Result<(), ParserError> {
    with_constant_column(parser, df, FILE_SOURCE, file_name)?;
    if let Some(date) = report_date {
        with_constant_column(parser, df, REPORT_DATE, &date.to_string())?;
    }
    Ok(())
}
