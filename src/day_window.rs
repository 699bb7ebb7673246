//! Canonical "today" computation for attendance.
//!
//! Exactly one rule defines the daily window: the half-open interval
//! `[local midnight, next local midnight)` in the configured reference
//! timezone. Every attendance operation computes the window once and reuses
//! the same value for the duplicate guard, the stored day key, and the
//! listing query, never recomputing it per call site.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The half-open daily interval for attendance purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    day: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
}

impl DayWindow {
    /// The window containing `now`, in reference timezone `tz`.
    pub fn containing(now: DateTime<Utc>, tz: Tz) -> Self {
        let day = now.with_timezone(&tz).date_naive();
        Self::for_day(day, tz)
    }

    /// The window for a specific calendar day.
    pub fn for_day(day: NaiveDate, tz: Tz) -> Self {
        let start = local_midnight(day, tz);
        let end = local_midnight(day + Duration::days(1), tz);
        Self {
            day,
            start,
            end,
            tz,
        }
    }

    /// Stored day key, `YYYY-MM-DD`. This is what the storage-level
    /// uniqueness constraint is keyed on.
    pub fn day_key(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    /// The window immediately after this one.
    pub fn next(&self) -> Self {
        Self::for_day(self.day + Duration::days(1), self.tz)
    }
}

/// Resolve local midnight of `day` as a UTC instant.
///
/// DST transitions can make midnight ambiguous (fall back: take the earlier
/// instant) or nonexistent (spring forward: take the first valid instant of
/// the day). Either way the result is a well-defined boundary and adjacent
/// windows never overlap.
fn local_midnight(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => {
            // Midnight was skipped; scan forward to the first representable
            // local time. DST gaps are at most a few hours.
            for minutes in 1..=180 {
                let candidate = midnight + Duration::minutes(minutes);
                if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            Utc.from_utc_datetime(&midnight)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn utc(s: &str) -> DateTime<Utc> {
        Utc.from_utc_datetime(&NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap())
    }

    #[test]
    fn test_utc_window_bounds() {
        let w = DayWindow::containing(utc("2026-03-02 09:00:00"), Tz::UTC);
        assert_eq!(w.day_key(), "2026-03-02");
        assert_eq!(w.start_utc(), utc("2026-03-02 00:00:00"));
        assert_eq!(w.end_utc(), utc("2026-03-03 00:00:00"));
    }

    #[test]
    fn test_half_open_containment() {
        let w = DayWindow::containing(utc("2026-03-02 12:00:00"), Tz::UTC);
        assert!(w.contains(utc("2026-03-02 00:00:00")));
        assert!(w.contains(utc("2026-03-02 23:59:59")));
        assert!(!w.contains(utc("2026-03-03 00:00:00")));
        assert!(!w.contains(utc("2026-03-01 23:59:59")));
    }

    #[test]
    fn test_local_timezone_shifts_day() {
        // 03:00 UTC on March 2 is still March 1 in Los Angeles (UTC-8)
        let now = utc("2026-03-02 03:00:00");
        let la = DayWindow::containing(now, Tz::America__Los_Angeles);
        assert_eq!(la.day_key(), "2026-03-01");

        let utc_window = DayWindow::containing(now, Tz::UTC);
        assert_eq!(utc_window.day_key(), "2026-03-02");
    }

    #[test]
    fn test_guard_and_listing_agree_on_one_window() {
        // The same instant always yields the same window regardless of how
        // many times it is computed.
        let now = utc("2026-07-15 18:30:00");
        let a = DayWindow::containing(now, Tz::Europe__Berlin);
        let b = DayWindow::containing(now, Tz::Europe__Berlin);
        assert_eq!(a, b);
    }

    #[test]
    fn test_next_window_is_adjacent() {
        let w = DayWindow::containing(utc("2026-03-02 09:00:00"), Tz::America__New_York);
        let next = w.next();
        assert_eq!(w.end_utc(), next.start_utc());
        assert_eq!(next.day_key(), "2026-03-03");
    }

    #[test]
    fn test_spring_forward_day_is_shorter_but_contiguous() {
        // US DST starts 2026-03-08; the LA day is 23 hours long.
        let w = DayWindow::for_day(
            NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
            Tz::America__Los_Angeles,
        );
        let len = w.end_utc() - w.start_utc();
        assert_eq!(len, Duration::hours(23));
        assert_eq!(w.next().start_utc(), w.end_utc());
    }

    #[test]
    fn test_fall_back_day_is_longer() {
        // US DST ends 2026-11-01; the LA day is 25 hours long.
        let w = DayWindow::for_day(
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            Tz::America__Los_Angeles,
        );
        let len = w.end_utc() - w.start_utc();
        assert_eq!(len, Duration::hours(25));
    }

    #[test]
    fn test_midnight_gap_timezone() {
        // Santiago springs forward at midnight: 2026-09-06 00:00 does not
        // exist locally. The window must still have a well-defined start and
        // stay contiguous with its neighbors.
        let day = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();
        let w = DayWindow::for_day(day, Tz::America__Santiago);
        let prev = DayWindow::for_day(day - Duration::days(1), Tz::America__Santiago);
        assert_eq!(prev.end_utc(), w.start_utc());
        assert!(w.start_utc() < w.end_utc());
    }
}
