//! Calendar helpers. Game dates follow the league's local time (KST).

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Korea Standard Time has no daylight saving.
const KST_OFFSET_SECS: i32 = 9 * 3600;

pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or(Utc.fix())
}

/// Today's date in Korea.
pub fn today() -> NaiveDate {
    today_at(Utc::now())
}

pub fn today_at(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&kst()).date_naive()
}

/// `YYYYMMDD`, the form used in game-center URLs and cache keys.
pub fn compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn parse_compact(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_uses_korean_date() {
        // 16:00 UTC is already the next day in Seoul
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 16, 0, 0).unwrap();
        assert_eq!(today_at(now), NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
    }

    #[test]
    fn test_compact_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 22).unwrap();
        assert_eq!(compact(date), "20250322");
        assert_eq!(parse_compact("20250322"), Some(date));
        assert_eq!(parse_compact("2025-03-22"), None);
    }
}
