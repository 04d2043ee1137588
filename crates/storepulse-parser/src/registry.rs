use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{
    AdsParser, LiveOverviewParser, OrdersParser, ShortVideoListParser, ShortVideoLiveParser,
    ShortVideoPerformanceParser, VideoOverviewParser,
};
use crate::model::{RawTable, SourceCategory};

pub trait SourceParser {
    fn name(&self) -> &'static str;
    fn parse(&self, file_name: &str, contents: &[u8]) -> Result<RawTable, ParserError>;
}

/// Parse one source file of a known category into a normalized raw table.
///
/// Every category except short-video video has exactly one layout. The
/// short-video video exports come in two layouts that can only be told
/// apart by looking at the sheet, so that category runs the attempt loop.
pub fn parse_source_file(
    category: SourceCategory,
    file_name: &str,
    contents: &[u8],
) -> Result<RawTable, ParserError> {
    match category {
        SourceCategory::Orders => OrdersParser.parse(file_name, contents),
        SourceCategory::Ads => AdsParser.parse(file_name, contents),
        SourceCategory::Live => LiveOverviewParser.parse(file_name, contents),
        SourceCategory::Video => VideoOverviewParser.parse(file_name, contents),
        SourceCategory::ShortVideoLive => ShortVideoLiveParser.parse(file_name, contents),
        SourceCategory::ShortVideoVideo => {
            let performance = ShortVideoPerformanceParser;
            let list = ShortVideoListParser;
            let parsers: [&dyn SourceParser; 2] = [&performance, &list];
            parse_with_parsers(file_name, contents, &parsers)
        }
    }
}

/// Try parsers in order, collecting format-mismatch reasons. Any error other
/// than a format mismatch is real and aborts the loop.
pub fn parse_with_parsers(
    file_name: &str,
    contents: &[u8],
    parsers: &[&dyn SourceParser],
) -> Result<RawTable, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(file_name, contents) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt::new(parser.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}
