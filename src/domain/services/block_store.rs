use crate::domain::models::block::{BlockKind, BlockedRange, RecurringBlock};
use crate::domain::models::time::{TimeOfDay, SLOT_MINUTES};
use crate::domain::services::timezone::weekday_index;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeMap;

pub fn split_into_cells(range: &BlockedRange) -> Vec<BlockedRange> {
    if range.end <= range.start {
        return Vec::new();
    }
    let start = range.start.floor_to_grid().minutes();
    let end = range.end.ceil_to_grid().minutes();

    (start..end)
        .step_by(SLOT_MINUTES as usize)
        .map(|m| {
            let mut cell = range.clone();
            cell.start = TimeOfDay::clamped(m as i64);
            cell.end = TimeOfDay::clamped((m + SLOT_MINUTES) as i64);
            cell
        })
        .collect()
}

pub fn normalize<I>(ranges: I) -> Vec<BlockedRange>
where
    I: IntoIterator<Item = BlockedRange>,
{
    let mut cells: Vec<BlockedRange> = ranges.into_iter().flat_map(|r| split_into_cells(&r)).collect();
    cells.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    cells.dedup();
    cells
}

type SortKey<'a> = (
    NaiveDate,
    TimeOfDay,
    BlockKind,
    Option<&'a str>,
    &'a str,
    &'a str,
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
);

fn sort_key(r: &BlockedRange) -> SortKey<'_> {
    (
        r.date,
        r.start,
        r.kind,
        r.booking_id.as_deref(),
        r.reason.as_str(),
        r.city.as_str(),
        r.booking_status.as_deref(),
        r.booking_type.as_deref(),
        r.label.as_deref(),
    )
}

pub fn expand_recurring<F>(recurring: &[RecurringBlock], dates: &[NaiveDate], zone_for: F) -> Vec<BlockedRange>
where
    F: Fn(NaiveDate) -> Tz,
{
    let mut out = Vec::new();
    for &date in dates {
        let weekday = weekday_index(date, zone_for(date));
        for rule in recurring.iter().filter(|r| r.applies_to(weekday)) {
            let Some((start, end)) = rule.window() else {
                continue;
            };
            let reason = if rule.reason.trim().is_empty() { "Recurring" } else { rule.reason.trim() };
            out.push(BlockedRange::new(date, start, end, BlockKind::Recurring, reason));
        }
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    by_date: BTreeMap<NaiveDate, Vec<BlockedRange>>,
}

impl BlockStore {
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = BlockedRange>,
    {
        let mut by_date: BTreeMap<NaiveDate, Vec<BlockedRange>> = BTreeMap::new();
        for cell in normalize(ranges) {
            by_date.entry(cell.date).or_default().push(cell);
        }
        Self { by_date }
    }

    pub fn merge(
        manual: Vec<BlockedRange>,
        template: Vec<BlockedRange>,
        recurring_expanded: Vec<BlockedRange>,
        booking: Vec<BlockedRange>,
    ) -> Self {
        Self::from_ranges(
            manual
                .into_iter()
                .chain(template)
                .chain(recurring_expanded)
                .chain(booking),
        )
    }

    pub fn on_date(&self, date: NaiveDate) -> &[BlockedRange] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockedRange> {
        self.by_date.values().flatten()
    }

    pub fn cells_at(&self, date: NaiveDate, minute: u32) -> impl Iterator<Item = &BlockedRange> {
        self.on_date(date)
            .iter()
            .filter(move |r| r.overlaps(minute, minute + SLOT_MINUTES))
    }

    // The range shown for a cell: highest display rank, earliest in sort
    // order on ties.
    pub fn cell(&self, date: NaiveDate, minute: u32) -> Option<&BlockedRange> {
        let mut best: Option<&BlockedRange> = None;
        for range in self.cells_at(date, minute) {
            if best.is_none_or(|b| range.display_rank() > b.display_rank()) {
                best = Some(range);
            }
        }
        best
    }

    // True when a slot-excluding range touches `[start, end)` on `date`.
    // Tentative bookings are ignored.
    pub fn intersects_hard(&self, date: NaiveDate, start: u32, end: u32) -> bool {
        self.on_date(date)
            .iter()
            .any(|r| !r.is_soft() && r.overlaps(start, end))
    }
}
