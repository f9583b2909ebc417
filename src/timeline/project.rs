//! Date-to-position projection onto the horizontal axis.

use chrono::NaiveDate;

use super::axis::AxisRange;

/// Maps absolute dates to fractional horizontal positions (0–100) within an
/// axis range. Positions are computed in whole days and are unclamped; with
/// dates taken from the range that produced the projector they stay within
/// [0, 100].
#[derive(Debug, Clone, Copy)]
pub struct PositionProjector {
    start: NaiveDate,
    total_days: i64,
}

impl PositionProjector {
    pub fn new(range: &AxisRange) -> Self {
        PositionProjector {
            start: range.start,
            total_days: (range.end - range.start).num_days(),
        }
    }

    /// Percent offset of a date from the range start.
    ///
    /// A degenerate zero-width range projects everything to 0.0 rather than
    /// dividing by zero.
    pub fn position_of(&self, date: NaiveDate) -> f64 {
        if self.total_days == 0 {
            return 0.0;
        }
        let days_since_start = (date - self.start).num_days();
        days_since_start as f64 / self.total_days as f64 * 100.0
    }

    /// Percent width of a bar spanning `start..=end`.
    pub fn width_of(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        self.position_of(end) - self.position_of(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::axis::AxisRange;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> AxisRange {
        AxisRange {
            start,
            end,
            months: Vec::new(),
        }
    }

    #[test]
    fn test_endpoints_project_to_zero_and_hundred() {
        let r = range(d(2024, 3, 1), d(2024, 8, 31));
        let p = PositionProjector::new(&r);
        assert_eq!(p.position_of(r.start), 0.0);
        assert_eq!(p.position_of(r.end), 100.0);
    }

    #[test]
    fn test_midpoint_is_fifty_percent() {
        let r = range(d(2024, 1, 1), d(2024, 1, 11));
        let p = PositionProjector::new(&r);
        assert!((p.position_of(d(2024, 1, 6)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_width_matches_position_difference() {
        let r = range(d(2024, 1, 1), d(2024, 1, 11));
        let p = PositionProjector::new(&r);
        let width = p.width_of(d(2024, 1, 3), d(2024, 1, 8));
        assert!((width - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_range_is_safe() {
        let r = AxisRange::degenerate(d(2024, 6, 15));
        let p = PositionProjector::new(&r);
        assert_eq!(p.position_of(d(2024, 6, 15)), 0.0);
        assert_eq!(p.position_of(d(2030, 1, 1)), 0.0);
        assert_eq!(p.width_of(d(2024, 6, 15), d(2024, 6, 20)), 0.0);
    }

    #[test]
    fn test_unclamped_outside_range() {
        let r = range(d(2024, 1, 1), d(2024, 1, 11));
        let p = PositionProjector::new(&r);
        assert!(p.position_of(d(2023, 12, 31)) < 0.0);
        assert!(p.position_of(d(2024, 1, 21)) > 100.0);
    }
}
