//! Timeline aggregation: from raw cards to ordered timeline items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::intervals::{derive_intervals, DerivedIntervals};
use crate::models::{Card, CardWithListLabel};

/// A card qualified for the timeline, with its derived windows.
///
/// Ephemeral: recomputed on every aggregation pass, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub card: Card,
    /// Title of the list the card currently belongs to, for display grouping.
    pub list_label: String,
    pub intervals: DerivedIntervals,
}

impl TimelineItem {
    /// Sort key: first non-null of construction-start, setup start, launch
    /// date, in that priority order.
    pub fn sort_date(&self) -> Option<NaiveDate> {
        self.card
            .construction_start_date
            .or(self.intervals.setup.map(|iv| iv.start))
            .or(self.card.launch_date)
    }
}

/// Build the ordered timeline from all cards of a board.
///
/// Cards with neither anchor set are dropped; the rest are sorted ascending
/// by [`TimelineItem::sort_date`]. The sort is stable, so ties keep their
/// incoming (list/position) order. An empty result is a valid state.
pub fn aggregate(cards: Vec<CardWithListLabel>) -> Vec<TimelineItem> {
    let mut items: Vec<TimelineItem> = cards
        .into_iter()
        .filter(|c| c.card.has_anchor())
        .map(|c| {
            let intervals = derive_intervals(c.card.launch_date, c.card.construction_start_date);
            TimelineItem {
                card: c.card,
                list_label: c.list_label,
                intervals,
            }
        })
        .collect();

    items.sort_by_key(|item| item.sort_date());
    items
}
