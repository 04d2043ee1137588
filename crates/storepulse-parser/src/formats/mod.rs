//! One module per source export shape.

mod ads;
mod common;
mod live;
mod orders;
mod shortvideo_live;
mod shortvideo_video;
mod video;

pub use ads::AdsParser;
pub use live::LiveOverviewParser;
pub use orders::OrdersParser;
pub use shortvideo_live::ShortVideoLiveParser;
pub use shortvideo_video::{ShortVideoListParser, ShortVideoPerformanceParser};
pub use video::VideoOverviewParser;

pub(crate) use common::{
    build_raw_frame, combine_two_row_headers, extract_date_range, extract_iso_date, read_csv_rows,
    read_first_sheet, stamp_provenance,
};
