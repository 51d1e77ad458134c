use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

use crate::store::LeadRecord;

/// Korea Standard Time, UTC+9 all year round.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Escapes text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders a UTC instant the way a ko-KR locale shows Seoul time,
/// e.g. `2024. 1. 5. 오후 3:04:05`.
pub fn format_seoul_time(at: DateTime<Utc>) -> String {
    let local = match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => at.with_timezone(&kst),
        None => at.fixed_offset(),
    };
    let (is_pm, hour) = local.hour12();
    format!(
        "{}. {}. {}. {} {}:{:02}:{:02}",
        local.year(),
        local.month(),
        local.day(),
        if is_pm { "오후" } else { "오전" },
        hour,
        local.minute(),
        local.second(),
    )
}

/// Builds the staff-facing text for a new lead.
pub fn format_lead_message(record: &LeadRecord) -> String {
    format!(
        "🚗 새로운 차량 매입 문의\n\n\
         📋 차량 번호: {}\n\
         🚘 차종/모델: {}\n\
         📞 연락처: {}\n\n\
         ⏰ 접수 시간: {}",
        escape_html(&record.car_number),
        escape_html(&record.car_model),
        escape_html(&record.phone_number),
        format_seoul_time(record.timestamp),
    )
}
