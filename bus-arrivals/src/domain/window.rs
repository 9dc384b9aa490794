//! Time windows used for ride searches.

use chrono::{DateTime, Duration, Utc};

/// Inclusive `[from, to]` interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// Window extending `radius` either side of `center`.
    ///
    /// Returns `None` if either bound falls outside the representable range.
    pub fn around(center: DateTime<Utc>, radius: Duration) -> Option<Self> {
        Some(Self {
            from: center.checked_sub_signed(radius)?,
            to: center.checked_add_signed(radius)?,
        })
    }

    /// Returns true if `t` lies inside the window, bounds included.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.from <= t && t <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 10, h, m, 0).unwrap()
    }

    #[test]
    fn around_is_symmetric() {
        let w = TimeWindow::around(at(8, 45), Duration::hours(4)).unwrap();
        assert_eq!(w.from, at(4, 45));
        assert_eq!(w.to, at(12, 45));
        assert_eq!(w.to - w.from, Duration::hours(8));
    }

    #[test]
    fn around_crosses_midnight() {
        let w = TimeWindow::around(at(1, 0), Duration::days(1)).unwrap();
        assert_eq!(w.from, Utc.with_ymd_and_hms(2023, 1, 9, 1, 0, 0).unwrap());
        assert_eq!(w.to, Utc.with_ymd_and_hms(2023, 1, 11, 1, 0, 0).unwrap());
    }

    #[test]
    fn contains_is_inclusive() {
        let w = TimeWindow::around(at(9, 0), Duration::hours(1)).unwrap();
        assert!(w.contains(at(8, 0)));
        assert!(w.contains(at(10, 0)));
        assert!(w.contains(at(9, 30)));
        assert!(!w.contains(at(7, 59)));
        assert!(!w.contains(at(10, 1)));
    }

    #[test]
    fn around_out_of_range_is_none() {
        assert!(TimeWindow::around(DateTime::<Utc>::MAX_UTC, Duration::hours(1)).is_none());
        assert!(TimeWindow::around(DateTime::<Utc>::MIN_UTC, Duration::hours(1)).is_none());
        assert!(TimeWindow::around(at(9, 0), Duration::days(100_000_000)).is_none());
    }
}
