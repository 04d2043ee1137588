//! Static source-to-canonical column dictionaries.
//!
//! The marketplace exports carry Thai column headers; the short-video
//! platform exports carry a different Thai vocabulary again. Each table maps
//! a source header to the canonical English field name the rest of the
//! pipeline (and the dashboard) is written against. The live/video overview
//! exports stack two header rows, so those are matched by substring pattern
//! against the combined header instead of by exact name.

/// Marketplace order workbook headers.
pub const ORDER_COLUMNS: &[(&str, &str)] = &[
    ("หมายเลขคำสั่งซื้อ", "Order_ID"),
    ("สถานะการสั่งซื้อ", "Order_Status"),
    ("วันที่ทำการสั่งซื้อ", "Order_Date"),
    ("ชื่อสินค้า", "Product_Name"),
    ("เลขอ้างอิง SKU (SKU Reference No.)", "SKU"),
    ("ราคาตั้งต้น", "Original_Price"),
    ("ราคาขาย", "Selling_Price"),
    ("จำนวน", "Quantity"),
    ("จำนวนที่ส่งคืน", "Return_Qty"),
    ("ราคาขายสุทธิ", "Net_Sales"),
    ("ส่วนลดจาก Shopee", "Marketplace_Discount"),
    ("โค้ดส่วนลดชำระโดยผู้ขาย", "Seller_Discount"),
    ("ค่าคอมมิชชั่น", "Commission"),
    ("Transaction Fee", "Transaction_Fee"),
    ("ค่าบริการ", "Service_Fee"),
    ("ค่าจัดส่งที่ชำระโดยผู้ซื้อ", "Shipping_Fee"),
    ("จำนวนเงินทั้งหมด", "Total_Amount"),
    ("จังหวัด", "Province"),
    ("เขต/อำเภอ", "District"),
    ("รหัสไปรษณีย์", "Postal_Code"),
    ("ช่องทางการชำระเงิน", "Payment_Method"),
    ("ชื่อผู้ใช้ (ผู้ซื้อ)", "Buyer_Username"),
];

/// Marketplace ads report headers (rows below the preamble block).
pub const ADS_COLUMNS: &[(&str, &str)] = &[
    ("ชื่อโฆษณา", "Ad_Name"),
    ("สถานะ", "Status"),
    ("ประเภทโฆษณา", "Ad_Type"),
    ("รหัสสินค้า", "Product_ID"),
    ("การมองเห็น", "Impressions"),
    ("จำนวนคลิก", "Clicks"),
    ("อัตราการคลิก (CTR)", "CTR"),
    ("การสั่งซื้อ", "Orders"),
    ("การสั่งซื้อโดยตรง", "Direct_Orders"),
    ("อัตราการสั่งซื้อ", "Conversion_Rate"),
    ("สินค้าที่ขายแล้ว", "Products_Sold"),
    ("ยอดขาย", "Sales"),
    ("ยอดขายโดยตรง", "Direct_Sales"),
    ("ค่าโฆษณา", "Ad_Cost"),
    ("ยอดขาย/รายจ่าย (ROAS)", "ROAS"),
    ("ACOS", "ACOS"),
];

/// Live overview metrics, matched by substring against the combined
/// two-row header.
pub const LIVE_METRIC_PATTERNS: &[(&str, &str)] = &[
    ("ระยะเวลาเก็บข้อมูล", "Report_Period"),
    ("ยอดขาย(คำสั่งซื้อที่เกิดขึ้น)", "Sales_Pending"),
    ("ยอดขาย(คำสั่งซื้อที่ยืนยันแล้ว)", "Sales_Confirmed"),
    ("คำสั่งซื้อ(คำสั่งซื้อที่เกิดขึ้น)", "Orders_Pending"),
    ("คำสั่งซื้อ(คำสั่งซื้อที่ยืนยันแล้ว)", "Orders_Confirmed"),
    ("จำนวน Live ทั้งหมด", "Total_Live_Sessions"),
    ("ระยะเวลา Live ทั้งหมด", "Total_Live_Duration"),
    ("ผู้ชมทั้งหมด", "Total_Viewers"),
    ("PCU", "Peak_Concurrent_Users"),
    ("GPM(คำสั่งซื้อที่เกิดขึ้น)", "GPM_Pending"),
    ("GPM(คำสั่งซื้อที่ยืนยันแล้ว)", "GPM_Confirmed"),
];

/// Video engagement overview metrics, same two-row header shape as live.
pub const VIDEO_METRIC_PATTERNS: &[(&str, &str)] = &[
    ("ระยะเวลาเก็บข้อมูล", "Report_Period"),
    ("ยอดขาย(คำสั่งซื้อที่เกิดขึ้น)", "Video_Sales_Pending"),
    ("ยอดขาย(คำสั่งซื้อที่ยืนยันแล้ว)", "Video_Sales_Confirmed"),
    ("คำสั่งซื้อ(คำสั่งซื้อที่เกิดขึ้น)", "Video_Orders_Pending"),
    ("คำสั่งซื้อ(คำสั่งซื้อที่ยืนยันแล้ว)", "Video_Orders_Confirmed"),
    ("ผู้ชมทั้งหมด", "Total_Viewers"),
    ("การเข้าชม", "Total_Views"),
    ("GPM(คำสั่งซื้อที่เกิดขึ้น)", "Video_GPM_Pending"),
    ("GPM(คำสั่งซื้อที่ยืนยันแล้ว)", "Video_GPM_Confirmed"),
    ("วิดีโอที่มีสินค้า", "Videos_With_Products"),
    ("วิดีโอที่สร้างรายได้", "Revenue_Generating_Videos"),
    ("ถูกใจ", "Total_Likes"),
    ("แชร์ทั้งหมด", "Total_Shares"),
    ("คอมเมนต์ทั้งหมด", "Total_Comments"),
    ("ผู้ติดตามใหม่", "New_Followers"),
];

/// Short-video live session export headers.
pub const SHORT_VIDEO_LIVE_COLUMNS: &[(&str, &str)] = &[
    ("ครีเอเตอร์ ID", "Creator_ID"),
    ("ครีเอเตอร์", "Creator"),
    ("ชื่อเล่น", "Nickname"),
    ("เริ่ม", "Start_Time"),
    ("ระยะเวลา", "Duration"),
    ("มูลค่าสินค้ารวมจาก LIVE (฿)", "GMV"),
    ("สินค้าที่เพิ่ม", "Products_Added"),
    ("ผลิตภัณฑ์ต่าง ๆ ที่ขาย", "Products_Sold"),
    ("คำสั่งซื้อ SKU ที่สร้างขึ้น", "Orders_Created"),
    ("คำสั่งซื้อ SKU จาก LIVE", "Orders"),
    ("รายการจาก LIVE ที่ขายได้", "Items_Sold"),
    ("ลูกค้าที่ไม่ซ้ำกัน", "Unique_Customers"),
    ("ราคาเฉลี่ย (฿)", "Avg_Price"),
    ("อัตราการคลิกเพื่อสั่งซื้อ (LIVE)", "CTR"),
    ("GMV ที่มาจากไลฟ์ (฿)", "Live_GMV"),
    ("ผู้ชม", "Viewers"),
    ("ยอดการดู", "Views"),
    ("ระยะเวลาการดูโดยเฉลี่ย (ไลฟ์สตรีม)", "Avg_Watch_Time"),
    ("ความคิดเห็น", "Comments"),
    ("การแชร์", "Shares"),
    ("ยอดการถูกใจของ LIVE", "Likes"),
    ("ผู้ติดตามใหม่ (วิดีโอครีเอเตอร์)", "New_Followers"),
    ("การแสดงผลสินค้า", "Product_Impressions"),
    ("การคลิกผลิตภัณฑ์", "Product_Clicks"),
    ("อัตราการคลิกผ่าน (CTR)", "Click_Through_Rate"),
];

/// Short-video performance export headers (headers on worksheet row 2).
pub const SHORT_VIDEO_VIDEO_COLUMNS: &[(&str, &str)] = &[
    ("ชื่อครีเอเตอร์", "Creator"),
    ("ครีเอเตอร์ ID", "Creator_ID"),
    ("ข้อมูลวิดีโอ", "Video_Title"),
    ("วิดีโอ ID", "Video_ID"),
    ("เวลา", "Post_Time"),
    ("สินค้า", "Product"),
    ("VV", "Views"),
    ("การกดถูกใจ", "Likes"),
    ("ความคิดเห็น", "Comments"),
    ("การแชร์", "Shares"),
    ("ผู้ติดตามใหม่", "New_Followers"),
    ("การคลิก V-to-L", "V_to_L_Clicks"),
    ("การแสดงผลสินค้า", "Product_Impressions"),
    ("การคลิกผลิตภัณฑ์", "Product_Clicks"),
    ("ลูกค้าที่ไม่ซ้ำกัน", "Unique_Customers"),
    ("คำสั่งซื้อ", "Orders"),
    ("รายการในวิดีโอที่ขายได้", "Items_Sold"),
    ("มูลค่าสินค้ารวม (วิดีโอ) (฿)", "GMV"),
    ("GPM (฿)", "GPM"),
    ("GMV ที่มาจากวิดีโอขายสินค้า (฿)", "Video_Sales_GMV"),
    ("อัตราการคลิกผ่าน (วิดีโอ)", "Video_CTR"),
    ("อัตรา V-to-L", "V_to_L_Rate"),
    ("อัตราการดูวิดีโอจนจบ", "Completion_Rate"),
    ("อัตราการคลิกเพื่อสั่งซื้อ (วิดีโอ)", "Conversion_Rate"),
    ("การวินิจฉัย", "Diagnosis"),
];

/// Alternate short-video export (video list, headers on worksheet row 0).
pub const SHORT_VIDEO_VIDEO_ALT_COLUMNS: &[(&str, &str)] = &[
    ("ชื่อวิดีโอ", "Video_Title"),
    ("ลิงก์วิดีโอ", "Video_Link"),
    ("วันที่โพสต์วิดีโอ", "Post_Date"),
    ("ชื่อผู้ใช้ของครีเอเตอร์", "Creator"),
    ("GMV", "GMV"),
    ("จำนวนที่ขายได้จากแอฟฟิลิเอต", "Items_Sold"),
    ("GMV จากวิดีโอขายสินค้าของแอฟฟิลิเอต", "Video_Sales_GMV"),
    ("มูลค่าคำสั่งซื้อเฉลี่ยจากวิดีโอขายสินค้า", "Avg_Order_Value"),
    ("ค่าคอมมิชชั่นโดยประมาณ", "Commission"),
    ("ค่าธรรมเนียมคงที่โดยประมาณ", "Fixed_Fee"),
    ("คำสั่งซื้อแอฟฟิลิเอต", "Orders"),
    ("ยอดการแสดงผลวิดีโอขายสินค้า", "Product_Impressions"),
    ("CTR จากแอฟฟิลิเอต", "CTR"),
    ("GPM จากวิดีโอขายสินค้า", "GPM"),
    ("จำนวนสินค้าแอฟฟิลิเอตที่คืนเงิน", "Refund_Items"),
    ("GMV ของการคืนเงินจากแอฟฟิลิเอต", "Refund_GMV"),
    ("ความคิดเห็นในวิดีโอขายสินค้า", "Comments"),
    ("การกดถูกใจในวิดีโอขายสินค้า", "Likes"),
];

/// Exact-name lookup into a column dictionary.
pub fn map_header(map: &[(&str, &'static str)], header: &str) -> Option<&'static str> {
    let trimmed = header.trim();
    map.iter()
        .find(|(source, _)| *source == trimmed)
        .map(|(_, canonical)| *canonical)
}

/// Substring-pattern lookup for combined two-row headers. First matching
/// pattern wins, so more specific patterns must come first in the table.
pub fn match_metric(patterns: &[(&str, &'static str)], combined_header: &str) -> Option<&'static str> {
    patterns
        .iter()
        .find(|(pattern, _)| combined_header.contains(pattern))
        .map(|(_, canonical)| *canonical)
}
