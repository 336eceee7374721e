//! Calendar-day helpers.
//!
//! All "daily" bookkeeping is keyed by the host's local calendar date.

use chrono::{DateTime, Local, NaiveDate};

/// Local calendar day for an instant.
pub fn day_of(now: DateTime<Local>) -> NaiveDate {
    now.date_naive()
}

/// The day `n` days before `day`, saturating at the earliest representable date.
pub fn days_before(day: NaiveDate, n: u32) -> NaiveDate {
    day.checked_sub_days(chrono::Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN)
}

/// Chart label for `day` as seen from `today`.
///
/// `"Today"`, `"Yesterday"`, otherwise the short weekday name (`"Mon"`).
pub fn display_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        day.format("%a").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn labels_today_and_yesterday() {
        let today = date(2024, 3, 13);
        assert_eq!(display_label(today, today), "Today");
        assert_eq!(display_label(date(2024, 3, 12), today), "Yesterday");
    }

    #[test]
    fn older_days_use_weekday_abbreviation() {
        // 2024-03-11 was a Monday.
        assert_eq!(display_label(date(2024, 3, 11), date(2024, 3, 13)), "Mon");
    }

    #[test]
    fn days_before_crosses_month_boundary() {
        assert_eq!(days_before(date(2024, 3, 1), 1), date(2024, 2, 29));
        assert_eq!(days_before(date(2024, 3, 1), 0), date(2024, 3, 1));
    }
}
