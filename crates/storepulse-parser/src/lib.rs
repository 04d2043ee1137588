pub mod columns;
pub mod errors;
pub mod formats;
pub mod model;
pub mod values;
mod registry;

pub use errors::{ParserAttempt, ParserError};
pub use model::{Platform, RawTable, SourceCategory, FILE_SOURCE, REPORT_DATE};
pub use registry::{parse_source_file, parse_with_parsers, SourceParser};
pub use values::{parse_currency, parse_duration, parse_percentage};

#[cfg(test)]
mod tests;
