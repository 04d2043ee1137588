use crate::errors::ParserError;
use crate::formats::{AdsParser, LiveOverviewParser, VideoOverviewParser};
use crate::model::{SourceCategory, FILE_SOURCE, REPORT_DATE};
use crate::registry::{parse_source_file, SourceParser};

const ADS_EXPORT: &str = "\
ชื่อร้านค้า,My Store,,,,,,,,,,,,,,
ช่วงเวลา,01/01/2026 - 31/01/2026,,,,,,,,,,,,,,
,,,,,,,,,,,,,,,
ลำดับ,ชื่อโฆษณา,สถานะ,ประเภทโฆษณา,รหัสสินค้า,การมองเห็น,จำนวนคลิก,อัตราการคลิก (CTR),การสั่งซื้อ,การสั่งซื้อโดยตรง,อัตราการสั่งซื้อ,สินค้าที่ขายแล้ว,ยอดขาย,ยอดขายโดยตรง,ค่าโฆษณา,ยอดขาย/รายจ่าย (ROAS)
1,แคมเปญ A,กำลังดำเนินการ,ค้นหา,12345,10000,250,2.50%,12,8,4.80%,15,\"฿5,400.00\",\"฿3,600.00\",\"฿1,200.00\",4.50
2,แคมเปญ B,หยุดชั่วคราว,ค้นหา,67890,4000,30,0.75%,0,0,0.00%,0,฿0.00,฿0.00,฿450.00,0.00
";

const LIVE_EXPORT: &str = "\
ภาพรวม,,,ยอดขาย,,,
ระยะเวลาเก็บข้อมูล,จำนวน Live ทั้งหมด,ระยะเวลา Live ทั้งหมด,ยอดขาย(คำสั่งซื้อที่เกิดขึ้น),ยอดขาย(คำสั่งซื้อที่ยืนยันแล้ว),ผู้ชมทั้งหมด,PCU
2026-01-31,3,2ชั่วโมง15นาที,\"฿12,500.00\",\"฿11,800.00\",842,120
";

const VIDEO_EXPORT: &str = "\
ภาพรวม,,ยอดขาย,,การมีส่วนร่วม,
ระยะเวลาเก็บข้อมูล,การเข้าชม,ยอดขาย(คำสั่งซื้อที่เกิดขึ้น),ยอดขาย(คำสั่งซื้อที่ยืนยันแล้ว),ถูกใจ,ผู้ติดตามใหม่
2026-01-31,5230,\"฿2,100.00\",\"฿1,950.00\",310,24
";

#[test]
fn ads_parser_skips_preamble_and_maps_headers() {
    let raw = AdsParser
        .parse("ads_report.csv", ADS_EXPORT.as_bytes())
        .expect("ads parse failed");

    assert_eq!(raw.df.height(), 2);
    assert!(raw.df.column("Ad_Name").is_ok());
    assert!(raw.df.column("ROAS").is_ok());
    assert!(raw.df.column(FILE_SOURCE).is_ok());
    // ads carry no per-record date and no filename date requirement
    assert!(raw.df.column(REPORT_DATE).is_err());

    let costs = raw.df.column("Ad_Cost").expect("Ad_Cost column");
    let first = costs.str().expect("utf8 column").get(0).expect("value");
    assert_eq!(first, "฿1,200.00");
}

#[test]
fn ads_parser_rejects_file_without_header_sentinel() {
    let garbled = "a,b,c\n1,2,3\n";
    let err = AdsParser
        .parse("ads_report.csv", garbled.as_bytes())
        .expect_err("should reject");
    assert!(matches!(err, ParserError::InvalidHeader { .. }));
}

#[test]
fn live_parser_combines_two_row_headers() {
    let raw = LiveOverviewParser
        .parse("live_overview_2026-01-31.csv", LIVE_EXPORT.as_bytes())
        .expect("live parse failed");

    assert_eq!(raw.df.height(), 1);
    assert!(raw.df.column("Sales_Pending").is_ok());
    assert!(raw.df.column("Sales_Confirmed").is_ok());
    assert!(raw.df.column("Total_Live_Sessions").is_ok());
    assert!(raw.df.column("Peak_Concurrent_Users").is_ok());

    let date = raw.df.column(REPORT_DATE).expect("report date");
    assert_eq!(
        date.str().expect("utf8 column").get(0),
        Some("2026-01-31")
    );
}

#[test]
fn live_parser_requires_filename_date() {
    let err = LiveOverviewParser
        .parse("live_overview.csv", LIVE_EXPORT.as_bytes())
        .expect_err("should reject undated file");
    assert!(matches!(err, ParserError::MissingFilenameDate { .. }));
}

#[test]
fn video_parser_uses_video_vocabulary() {
    let raw = VideoOverviewParser
        .parse("video_overview_2026-01-31.csv", VIDEO_EXPORT.as_bytes())
        .expect("video parse failed");

    assert!(raw.df.column("Video_Sales_Pending").is_ok());
    assert!(raw.df.column("Video_Sales_Confirmed").is_ok());
    assert!(raw.df.column("Total_Views").is_ok());
    assert!(raw.df.column("New_Followers").is_ok());
    assert!(raw.df.column("Sales_Pending").is_err());
}

#[test]
fn unknown_schema_is_a_loud_error() {
    let foreign = "\
ลำดับ,colonne_a,colonne_b
1,x,y
";
    let err = AdsParser
        .parse("ads_report.csv", foreign.as_bytes())
        .expect_err("unmapped schema must not parse");
    assert!(matches!(err, ParserError::UnmappedSchema { .. }));
}

#[test]
fn category_dispatch_routes_to_the_right_parser() {
    let raw = parse_source_file(
        SourceCategory::Ads,
        "ads_report.csv",
        ADS_EXPORT.as_bytes(),
    )
    .expect("dispatch failed");
    assert_eq!(raw.source_file, "ads_report.csv");

    let raw = parse_source_file(
        SourceCategory::Live,
        "live_overview_2026-01-31.csv",
        LIVE_EXPORT.as_bytes(),
    )
    .expect("dispatch failed");
    assert_eq!(raw.df.height(), 1);
}
