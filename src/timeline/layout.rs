//! Render boundary: bars and axis labels for the timeline view.
//!
//! The renderer draws each row as absolutely positioned bars; this module
//! turns derived windows into `{label, left, width, tooltip}` tuples so the
//! frontend carries no date logic at all.

use serde::{Deserialize, Serialize};

use super::aggregate::TimelineItem;
use super::axis::{AxisRange, MonthBucket};
use super::intervals::DateInterval;
use super::project::PositionProjector;
use crate::api::CardId;

/// A single horizontal bar, positioned in percent of the axis width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBar {
    pub label: String,
    pub left_percent: f64,
    pub width_percent: f64,
    pub tooltip: String,
}

/// One row of the timeline: a card and its bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub card_id: CardId,
    pub title: String,
    pub list_label: String,
    pub company_url: String,
    pub candidate_url: String,
    pub bars: Vec<TimelineBar>,
}

/// Complete renderable timeline: rows plus the axis header months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineViewData {
    pub rows: Vec<TimelineRow>,
    pub months: Vec<MonthBucket>,
    pub range_start: chrono::NaiveDate,
    pub range_end: chrono::NaiveDate,
}

fn short_date(date: chrono::NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}/{}", date.month(), date.day())
}

fn bar(projector: &PositionProjector, label: &str, iv: DateInterval) -> TimelineBar {
    TimelineBar {
        label: label.to_string(),
        left_percent: projector.position_of(iv.start),
        width_percent: projector.width_of(iv.start, iv.end),
        tooltip: format!("{}: {} – {}", label, short_date(iv.start), short_date(iv.end)),
    }
}

fn bars_for(item: &TimelineItem, projector: &PositionProjector) -> Vec<TimelineBar> {
    let mut bars = Vec::new();

    for (idx, payment) in item.intervals.payments.iter().enumerate() {
        bars.push(bar(projector, &format!("Payment {}", idx + 1), *payment));
    }
    if let Some(iv) = item.intervals.construction {
        bars.push(bar(projector, "Construction", iv));
    }
    if let Some(iv) = item.intervals.setup {
        bars.push(bar(projector, "Setup", iv));
    }
    if let Some(iv) = item.intervals.launch {
        bars.push(bar(projector, "Open", iv));
    }
    if let Some(iv) = item.intervals.follow_up {
        bars.push(bar(projector, "Follow-up", iv));
    }

    // A construction-start-only card derives no windows; emit a zero-width
    // marker at the raw anchor so the row is not blank.
    if bars.is_empty() {
        if let Some(anchor) = item.card.construction_start_date {
            bars.push(TimelineBar {
                label: "Construction start".to_string(),
                left_percent: projector.position_of(anchor),
                width_percent: 0.0,
                tooltip: format!("Construction start: {}", short_date(anchor)),
            });
        }
    }

    bars
}

/// Project every item's windows onto the axis range.
pub fn build_layout(items: &[TimelineItem], range: &AxisRange) -> TimelineViewData {
    let projector = PositionProjector::new(range);

    let rows = items
        .iter()
        .map(|item| TimelineRow {
            card_id: item.card.id,
            title: item.card.title.clone(),
            list_label: item.list_label.clone(),
            company_url: item.card.company_url.clone(),
            candidate_url: item.card.candidate_url.clone(),
            bars: bars_for(item, &projector),
        })
        .collect();

    TimelineViewData {
        rows,
        months: range.months.clone(),
        range_start: range.start,
        range_end: range.end,
    }
}
