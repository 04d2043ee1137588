use polars::prelude::DataFrame;

/// Provenance column stamped on every normalized table.
pub const FILE_SOURCE: &str = "File_Source";
/// Derived date column for filename-dated categories, ISO `YYYY-MM-DD`.
pub const REPORT_DATE: &str = "Report_Date";

/// The six source-file categories the pipeline ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    Orders,
    Ads,
    Live,
    Video,
    ShortVideoLive,
    ShortVideoVideo,
}

impl SourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Orders => "orders",
            SourceCategory::Ads => "ads",
            SourceCategory::Live => "live",
            SourceCategory::Video => "video",
            SourceCategory::ShortVideoLive => "short_video_live",
            SourceCategory::ShortVideoVideo => "short_video_video",
        }
    }

    /// File extension the category's exports arrive in.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceCategory::Orders | SourceCategory::ShortVideoLive
            | SourceCategory::ShortVideoVideo => "xlsx",
            SourceCategory::Ads | SourceCategory::Live | SourceCategory::Video => "csv",
        }
    }

    /// Whether the record date must be recovered from the file name.
    pub fn filename_dated(&self) -> bool {
        matches!(self, SourceCategory::Live | SourceCategory::Video)
    }

    pub fn platform(&self) -> Platform {
        match self {
            SourceCategory::Orders
            | SourceCategory::Ads
            | SourceCategory::Live
            | SourceCategory::Video => Platform::Marketplace,
            SourceCategory::ShortVideoLive | SourceCategory::ShortVideoVideo => {
                Platform::ShortVideo
            }
        }
    }
}

/// Selling platform a record originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Marketplace,
    ShortVideo,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Marketplace => "marketplace",
            Platform::ShortVideo => "short_video",
        }
    }
}

/// One parsed source file: canonical English column names, every data column
/// still `String`-typed. Numeric conversion happens in the cleaning stage,
/// never here.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub df: DataFrame,
    pub source_file: String,
}
