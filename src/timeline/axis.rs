//! Axis range calculation: the month-normalized visible span of the timeline.

use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::TimelineItem;

/// One calendar month of the axis header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    /// Human-readable label, e.g. "Jun 2024".
    pub label: String,
}

/// The visible date span, padded and aligned to whole months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Every calendar month from `start` to `end` inclusive.
    pub months: Vec<MonthBucket>,
}

impl AxisRange {
    /// Zero-width range anchored at the given date, with no month buckets.
    /// Rendered as an empty axis; a valid state, not an error.
    pub fn degenerate(at: NaiveDate) -> Self {
        AxisRange {
            start: at,
            end: at,
            months: Vec::new(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists for a valid date's month.
    date.with_day(1).unwrap_or(date)
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Compute the visible axis range over all items.
///
/// Scans every endpoint of every derived window plus the raw anchor dates
/// (a card carrying only a construction start has no windows but still needs
/// a position). The span is padded one month back and one month forward and
/// aligned to whole months: `start` is the 1st of the month before the
/// earliest date, `end` is the last day of the month after the latest date.
pub fn compute_range(items: &[TimelineItem]) -> AxisRange {
    let mut min: Option<NaiveDate> = None;
    let mut max: Option<NaiveDate> = None;

    let mut observe = |date: NaiveDate| {
        min = Some(min.map_or(date, |m| m.min(date)));
        max = Some(max.map_or(date, |m| m.max(date)));
    };

    for item in items {
        for date in item.intervals.dates() {
            observe(date);
        }
        if let Some(d) = item.card.launch_date {
            observe(d);
        }
        if let Some(d) = item.card.construction_start_date {
            observe(d);
        }
    }

    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        _ => return AxisRange::degenerate(Utc::now().date_naive()),
    };

    let start = match first_of_month(min).checked_sub_months(Months::new(1)) {
        Some(d) => d,
        None => return AxisRange::degenerate(Utc::now().date_naive()),
    };
    // End-of-month of (max + 1 month): step two months from the 1st, back one day.
    let end = match first_of_month(max)
        .checked_add_months(Months::new(2))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
    {
        Some(d) => d,
        None => return AxisRange::degenerate(Utc::now().date_naive()),
    };

    let mut months = Vec::new();
    let mut current = start;
    while current <= end {
        months.push(MonthBucket {
            year: current.year(),
            month: current.month(),
            label: month_label(current),
        });
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }

    AxisRange { start, end, months }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, CardWithListLabel};
    use crate::timeline::aggregate::aggregate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn items(
        specs: Vec<(Option<NaiveDate>, Option<NaiveDate>)>,
    ) -> Vec<TimelineItem> {
        let now = chrono::Utc::now();
        aggregate(
            specs
                .into_iter()
                .map(|(launch, cs)| CardWithListLabel {
                    card: Card {
                        id: crate::api::CardId::generate(),
                        list_id: crate::api::ListId::generate(),
                        title: "t".to_string(),
                        status: String::new(),
                        memo: String::new(),
                        launch_date: launch,
                        construction_start_date: cs,
                        candidate_url: String::new(),
                        candidate_url2: String::new(),
                        company_name: String::new(),
                        company_url: String::new(),
                        position: 0,
                        tracker_list_id: None,
                        tracker_card_id: None,
                        created_at: now,
                        updated_at: now,
                    },
                    list_label: "l".to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_empty_items_give_degenerate_range() {
        let range = compute_range(&[]);
        assert!(range.is_degenerate());
        assert!(range.months.is_empty());
    }

    #[test]
    fn test_range_is_month_aligned() {
        // Launch 2024-06-15: earliest derived date is the second payment
        // window start 2024-04-15, latest is the third payment end 2024-07-21.
        let items = items(vec![(Some(d(2024, 6, 15)), None)]);
        let range = compute_range(&items);
        assert_eq!(range.start, d(2024, 3, 1));
        assert_eq!(range.end, d(2024, 8, 31));
    }

    #[test]
    fn test_month_buckets_cover_range() {
        let items = items(vec![(Some(d(2024, 6, 15)), None)]);
        let range = compute_range(&items);
        assert_eq!(range.months.len(), 6); // Mar..Aug
        assert_eq!(range.months[0].year, 2024);
        assert_eq!(range.months[0].month, 3);
        assert_eq!(range.months[0].label, "Mar 2024");
        let last = range.months.last().unwrap();
        assert_eq!((last.year, last.month), (2024, 8));
    }

    #[test]
    fn test_range_contains_all_derived_dates() {
        let items = items(vec![
            (Some(d(2024, 6, 15)), Some(d(2024, 1, 10))),
            (Some(d(2025, 2, 1)), None),
        ]);
        let range = compute_range(&items);
        for item in &items {
            for date in item.intervals.dates() {
                assert!(range.start <= date && date <= range.end);
            }
        }
    }

    #[test]
    fn test_raw_anchor_only_still_spans() {
        // Construction-start-only card derives no windows but the anchor
        // itself must fall inside the range.
        let items = items(vec![(None, Some(d(2024, 6, 15)))]);
        let range = compute_range(&items);
        assert_eq!(range.start, d(2024, 5, 1));
        assert_eq!(range.end, d(2024, 7, 31));
        assert_eq!(range.months.len(), 3);
    }

    #[test]
    fn test_year_boundary_buckets() {
        let items = items(vec![(None, Some(d(2024, 12, 20)))]);
        let range = compute_range(&items);
        assert_eq!(range.start, d(2024, 11, 1));
        assert_eq!(range.end, d(2025, 1, 31));
        let labels: Vec<_> = range.months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Nov 2024", "Dec 2024", "Jan 2025"]);
    }
}
