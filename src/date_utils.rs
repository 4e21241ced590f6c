//! Date and time helpers
//!
//! Tracked data is keyed by epoch day (days since 1970-01-01).

use chrono::{Datelike, Local, NaiveDate, NaiveTime, Timelike};

/// 1970-01-01 as days since 0001-01-01 (chrono's common era day 1)
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Convert a calendar date to an epoch day
pub fn to_epoch_day(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert an epoch day back to a calendar date
pub fn from_epoch_day(day: i64) -> Option<NaiveDate> {
    let days_from_ce = i32::try_from(day.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce)
}

/// Today's epoch day in the local time zone
pub fn today_epoch_day() -> i64 {
    to_epoch_day(Local::now().date_naive())
}

/// Seconds elapsed since midnight
pub fn seconds_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

/// Seconds elapsed since local midnight
pub fn now_seconds_of_day() -> u32 {
    seconds_of_day(Local::now().time())
}

/// Short display form: `d.m` within `today`'s year, `d.m.yyyy` otherwise
pub fn format_epoch_day(day: i64, today: NaiveDate) -> String {
    match from_epoch_day(day) {
        Some(date) if date.year() == today.year() => format!("{}.{}", date.day(), date.month()),
        Some(date) => format!("{}.{}.{}", date.day(), date.month(), date.year()),
        None => day.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_day_origin() {
        assert_eq!(to_epoch_day(date(1970, 1, 1)), 0);
        assert_eq!(to_epoch_day(date(1969, 12, 31)), -1);
        assert_eq!(to_epoch_day(date(2024, 1, 1)), 19723);
    }

    #[test]
    fn test_epoch_day_round_trip() {
        let d = date(2026, 10, 16);
        assert_eq!(from_epoch_day(to_epoch_day(d)), Some(d));
    }

    #[test]
    fn test_seconds_of_day() {
        let t = NaiveTime::from_hms_opt(1, 2, 3).unwrap();
        assert_eq!(seconds_of_day(t), 3723);
        assert!(now_seconds_of_day() < 86_400);
    }

    #[test]
    fn test_format_epoch_day() {
        let today = date(2024, 6, 1);
        assert_eq!(format_epoch_day(to_epoch_day(date(2024, 3, 5)), today), "5.3");
        assert_eq!(format_epoch_day(to_epoch_day(date(2023, 12, 24)), today), "24.12.2023");
    }

    #[test]
    fn test_out_of_range_day_falls_back_to_number() {
        assert_eq!(from_epoch_day(i64::MAX), None);
        assert_eq!(from_epoch_day(i64::MIN), None);
        let today = date(2024, 6, 1);
        assert_eq!(format_epoch_day(i64::MAX, today), i64::MAX.to_string());
    }
}
