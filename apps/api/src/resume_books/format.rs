use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// "Monday, September 02, 2024 @ 9:00 AM" in the reader's timezone.
pub fn format_deadline(instant: DateTime<Utc>, timezone: Tz) -> String {
    instant
        .with_timezone(&timezone)
        .format("%A, %B %d, %Y @ %-I:%M %p")
        .to_string()
}

/// "August 2021 - May 2025". Education dates are calendar dates, so no
/// timezone applies.
pub fn format_month_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%B %Y"), end.format("%B %Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deadline_in_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 9, 2, 21, 5, 0).unwrap();
        assert_eq!(format_deadline(instant, Tz::UTC), "Monday, September 02, 2024 @ 9:05 PM");
    }

    #[test]
    fn test_deadline_shifts_into_reader_timezone() {
        let instant = Utc.with_ymd_and_hms(2024, 9, 3, 2, 0, 0).unwrap();
        assert_eq!(
            format_deadline(instant, Tz::America__New_York),
            "Monday, September 02, 2024 @ 10:00 PM"
        );
    }

    #[test]
    fn test_deadline_follows_daylight_saving() {
        // Same UTC wall time on either side of the 2024-11-03 fall-back.
        let summer = Utc.with_ymd_and_hms(2024, 11, 3, 2, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 11, 4, 2, 0, 0).unwrap();
        assert_eq!(
            format_deadline(summer, Tz::America__New_York),
            "Saturday, November 02, 2024 @ 10:00 PM"
        );
        assert_eq!(
            format_deadline(winter, Tz::America__New_York),
            "Sunday, November 03, 2024 @ 9:00 PM"
        );
    }

    #[test]
    fn test_month_range() {
        let start = NaiveDate::from_ymd_opt(2021, 8, 23).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        assert_eq!(format_month_range(start, end), "August 2021 - May 2025");
    }
}
