//! Interval derivation from card anchor dates.
//!
//! Given the two optional anchors of a card, [`derive_intervals`] computes
//! every dependent window by fixed calendar offsets:
//!
//! - launch window: the launch date plus the following day (2 days);
//! - setup window: the month immediately preceding launch, ending the day
//!   before it;
//! - construction window: from the construction-start date to the day before
//!   the setup window begins;
//! - follow-up window: starts 3 days after the launch window ends, lasts one
//!   calendar month;
//! - up to three 7-day payment windows anchored at construction-start − 10
//!   days, setup-start − 1 month and launch + 1 month respectively.
//!
//! The construction window requires the setup window, not just the
//! construction-start date: with no launch date there is no setup window, so
//! the construction window (and with it the first payment window) is absent
//! even though the construction-start anchor is present. This coupling is
//! deliberate product behavior and must not be "fixed". Likewise a
//! construction start that does not strictly precede the setup window's eve
//! derives no window: every emitted interval ends after it starts.
//!
//! Month offsets use [`chrono::Months`], which clamps to the end of the
//! target month (Mar 31 − 1 month = Feb 28/29, Jan 31 − 1 month = Dec 31).

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A closed calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateInterval { start, end }
    }

    /// Number of calendar days covered, endpoints inclusive.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// All windows derivable from a card's anchors. Absent prerequisites make
/// the corresponding window `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedIntervals {
    pub construction: Option<DateInterval>,
    pub setup: Option<DateInterval>,
    pub launch: Option<DateInterval>,
    pub follow_up: Option<DateInterval>,
    /// Ordered payment windows (at most three, each exactly 7 days).
    pub payments: Vec<DateInterval>,
}

impl DerivedIntervals {
    /// Every endpoint date of every present window.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.construction
            .iter()
            .chain(self.setup.iter())
            .chain(self.launch.iter())
            .chain(self.follow_up.iter())
            .chain(self.payments.iter())
            .flat_map(|iv| [iv.start, iv.end])
    }

    /// True when no window could be derived at all.
    pub fn is_empty(&self) -> bool {
        self.construction.is_none()
            && self.setup.is_none()
            && self.launch.is_none()
            && self.follow_up.is_none()
            && self.payments.is_empty()
    }
}

fn seven_day_window(start: Option<NaiveDate>) -> Option<DateInterval> {
    let start = start?;
    let end = start.checked_add_days(Days::new(6))?;
    Some(DateInterval::new(start, end))
}

/// Derive all dependent windows from the two anchors.
///
/// Pure and total: invalid combinations yield `None` windows, never a panic.
/// Checked calendar arithmetic means a window silently drops out at the
/// extreme ends of the representable date range instead of overflowing.
pub fn derive_intervals(
    launch_date: Option<NaiveDate>,
    construction_start_date: Option<NaiveDate>,
) -> DerivedIntervals {
    let launch = launch_date.and_then(|l| {
        let end = l.checked_add_days(Days::new(1))?;
        Some(DateInterval::new(l, end))
    });

    let setup = launch_date.and_then(|l| {
        let start = l.checked_sub_months(Months::new(1))?;
        let end = l.checked_sub_days(Days::new(1))?;
        Some(DateInterval::new(start, end))
    });

    // Requires the setup window, not just the construction-start anchor.
    // A start on or past the window's end would collapse or invert it, so
    // only a start strictly before the end derives a window.
    let construction = match (construction_start_date, setup) {
        (Some(cs), Some(setup)) => setup
            .start
            .checked_sub_days(Days::new(1))
            .filter(|end| cs < *end)
            .map(|end| DateInterval::new(cs, end)),
        _ => None,
    };

    let follow_up = launch.and_then(|iv| {
        let start = iv.end.checked_add_days(Days::new(3))?;
        let end = start.checked_add_months(Months::new(1))?;
        Some(DateInterval::new(start, end))
    });

    let mut payments = Vec::with_capacity(3);
    if construction.is_some() {
        if let Some(cs) = construction_start_date {
            if let Some(iv) = seven_day_window(cs.checked_sub_days(Days::new(10))) {
                payments.push(iv);
            }
        }
    }
    if let Some(setup) = setup {
        if let Some(iv) = seven_day_window(setup.start.checked_sub_months(Months::new(1))) {
            payments.push(iv);
        }
    }
    if let Some(l) = launch_date {
        if let Some(iv) = seven_day_window(l.checked_add_months(Months::new(1))) {
            payments.push(iv);
        }
    }

    DerivedIntervals {
        construction,
        setup,
        launch,
        follow_up,
        payments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_launch_window_is_two_days() {
        let iv = derive_intervals(Some(d(2024, 6, 15)), None);
        let launch = iv.launch.unwrap();
        assert_eq!(launch, DateInterval::new(d(2024, 6, 15), d(2024, 6, 16)));
        assert_eq!(launch.len_days(), 2);
    }

    #[test]
    fn test_setup_window_precedes_launch_by_one_month() {
        let iv = derive_intervals(Some(d(2024, 6, 15)), None);
        assert_eq!(
            iv.setup.unwrap(),
            DateInterval::new(d(2024, 5, 15), d(2024, 6, 14))
        );
    }

    #[test]
    fn test_follow_up_window() {
        // Launch ends 06-16; follow-up starts 3 days later and lasts a month.
        let iv = derive_intervals(Some(d(2024, 6, 15)), None);
        assert_eq!(
            iv.follow_up.unwrap(),
            DateInterval::new(d(2024, 6, 19), d(2024, 7, 19))
        );
    }

    #[test]
    fn test_construction_window_with_both_anchors() {
        let iv = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 3, 1)));
        // Setup starts 05-15, so construction runs through 05-14.
        assert_eq!(
            iv.construction.unwrap(),
            DateInterval::new(d(2024, 3, 1), d(2024, 5, 14))
        );
    }

    #[test]
    fn test_construction_requires_launch() {
        // Documented coupling: construction-start alone derives nothing.
        let iv = derive_intervals(None, Some(d(2024, 6, 15)));
        assert!(iv.construction.is_none());
        assert!(iv.payments.is_empty());
        assert!(iv.is_empty());
    }

    #[test]
    fn test_construction_start_inside_setup_derives_no_window() {
        // A construction start on or after the setup window would run the
        // window backwards; it derives nothing, and payment 1 drops with it.
        let iv = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 6, 1)));
        assert!(iv.construction.is_none());
        assert_eq!(iv.payments.len(), 2);
        for window in iv
            .setup
            .iter()
            .chain(iv.launch.iter())
            .chain(iv.follow_up.iter())
            .chain(iv.payments.iter())
        {
            assert!(window.end > window.start);
        }
    }

    #[test]
    fn test_construction_boundary_before_setup() {
        // Setup begins 05-15; the window ends 05-14. Starting on the end day
        // would collapse it to a point, so 05-13 is the latest usable start.
        let iv = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 5, 14)));
        assert!(iv.construction.is_none());

        let iv = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 5, 13)));
        assert_eq!(
            iv.construction.unwrap(),
            DateInterval::new(d(2024, 5, 13), d(2024, 5, 14))
        );
    }

    #[test]
    fn test_all_three_payment_windows() {
        let iv = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 3, 1)));
        assert_eq!(iv.payments.len(), 3);
        // construction-start − 10 days
        assert_eq!(
            iv.payments[0],
            DateInterval::new(d(2024, 2, 20), d(2024, 2, 26))
        );
        // setup start (05-15) − 1 month
        assert_eq!(
            iv.payments[1],
            DateInterval::new(d(2024, 4, 15), d(2024, 4, 21))
        );
        // launch + 1 month
        assert_eq!(
            iv.payments[2],
            DateInterval::new(d(2024, 7, 15), d(2024, 7, 21))
        );
        for p in &iv.payments {
            assert_eq!(p.len_days(), 7);
        }
    }

    #[test]
    fn test_launch_only_has_two_payment_windows() {
        let iv = derive_intervals(Some(d(2024, 6, 15)), None);
        assert_eq!(iv.payments.len(), 2);
        assert_eq!(
            iv.payments[1],
            DateInterval::new(d(2024, 7, 15), d(2024, 7, 21))
        );
    }

    #[test]
    fn test_no_anchors_derives_nothing() {
        assert!(derive_intervals(None, None).is_empty());
    }

    #[test]
    fn test_month_end_clamping() {
        // Mar 31 − 1 month clamps to Feb 29 in a leap year.
        let iv = derive_intervals(Some(d(2024, 3, 31)), None);
        assert_eq!(
            iv.setup.unwrap(),
            DateInterval::new(d(2024, 2, 29), d(2024, 3, 30))
        );
        // Non-leap year clamps to Feb 28.
        let iv = derive_intervals(Some(d(2023, 3, 31)), None);
        assert_eq!(iv.setup.unwrap().start, d(2023, 2, 28));
    }

    #[test]
    fn test_month_end_rollforward() {
        // Jan 31 + 1 month clamps to the end of February.
        let iv = derive_intervals(Some(d(2024, 1, 31)), None);
        assert_eq!(
            iv.payments[1],
            DateInterval::new(d(2024, 2, 29), d(2024, 3, 6))
        );
    }

    #[test]
    fn test_year_boundary() {
        let iv = derive_intervals(Some(d(2025, 1, 15)), None);
        assert_eq!(
            iv.setup.unwrap(),
            DateInterval::new(d(2024, 12, 15), d(2025, 1, 14))
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 3, 1)));
        let b = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 3, 1)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_dates_covers_all_endpoints() {
        let iv = derive_intervals(Some(d(2024, 6, 15)), Some(d(2024, 3, 1)));
        let dates: Vec<_> = iv.dates().collect();
        // 4 named windows + 3 payment windows, two endpoints each.
        assert_eq!(dates.len(), 14);
        assert!(dates.contains(&d(2024, 3, 1)));
        assert!(dates.contains(&d(2024, 7, 21)));
    }
}
