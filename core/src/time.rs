//! Time related utils.
//!
//! All formatting here is UTC-only and locale-independent. SigV4 embeds the
//! signing instant twice (full timestamp in the request, date in the scope),
//! and both renderings must come from the same instant. The [`Clock`] trait
//! hands out that instant so callers can pin it in tests.

use std::fmt::Debug;

use chrono::Utc;

/// DateTime used by cloudsign, UTC only.
pub type DateTime = chrono::DateTime<Utc>;

/// Get the current UTC time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime into the scope date: `20150830`.
///
/// Uses `%Y`, the calendar year. The week-based year (`ISO 8601 "YYYY"` in
/// other date libraries) differs from the calendar year around new year and
/// must not be used here.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a datetime into ISO 8601 basic format: `20150830T123600Z`.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Clock supplies the current UTC time to signers.
///
/// Production code uses [`SystemClock`]. Tests inject a [`FixedClock`] so
/// signatures are reproducible.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Return the current UTC time.
    fn now_utc(&self) -> DateTime;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime {
        now()
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let t = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        assert_eq!(format_date(t), "20150830");
    }

    #[test]
    fn test_format_iso8601() {
        let t = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        assert_eq!(format_iso8601(t), "20150830T123600Z");
    }

    #[test]
    fn test_calendar_year_around_new_year() {
        // 2019-12-30 falls in ISO week 1 of 2020. The scope date must still
        // carry the calendar year.
        let t = Utc.with_ymd_and_hms(2019, 12, 30, 23, 59, 59).unwrap();
        assert_eq!(format_date(t), "20191230");
        assert_eq!(format_iso8601(t), "20191230T235959Z");
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let t = Utc.with_ymd_and_hms(2020, 4, 12, 8, 15, 59).unwrap();
        let clock = FixedClock(t);
        assert_eq!(clock.now_utc(), clock.now_utc());
        assert_eq!(format_date(clock.now_utc()), "20200412");
    }
}
