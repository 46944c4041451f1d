use crate::domain::models::block::{BlockKind, BlockedRange};
use crate::domain::models::session_length::SessionLength;
use crate::domain::models::time::{TimeOfDay, SLOT_MINUTES};
use crate::domain::services::availability::{Availability, SlotResolver};
use crate::domain::services::block_store::{expand_recurring, BlockStore};
use crate::domain::services::snapshot::BookingSnapshot;
use crate::domain::services::time_grid::day_cells;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SlotView {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub label: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct DayView {
    pub date: NaiveDate,
    pub city: String,
    pub timezone: String,
    pub buffer_minutes: u32,
    pub status: &'static str,
    pub slots: Vec<SlotView>,
}

pub fn client_day_view(
    resolver: &SlotResolver<'_>,
    snapshot: &BookingSnapshot,
    date: NaiveDate,
    city: &str,
    length: SessionLength,
) -> DayView {
    let ctx = resolver.day(date, city);
    let availability = resolver.resolve(date, city, length);

    let display_city = ctx
        .schedule
        .map(|s| s.city.clone())
        .or_else(|| Some(snapshot.tour.city_for_date(date).to_string()).filter(|c| !c.is_empty()))
        .unwrap_or_else(|| snapshot.settings.tour_city.clone());

    DayView {
        date,
        city: display_city,
        timezone: ctx.zone.name().to_string(),
        buffer_minutes: ctx.buffer,
        status: availability.status(),
        slots: slot_views(&availability),
    }
}

fn slot_views(availability: &Availability) -> Vec<SlotView> {
    availability
        .slots()
        .iter()
        .map(|r| SlotView {
            start: r.start,
            end: r.end,
            label: r.label(),
        })
        .collect()
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GridCell {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_status: Option<String>,
    pub tentative: bool,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub bookings: usize,
    pub paid: usize,
    pub manual: bool,
    pub recurring: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct GridDay {
    pub date: NaiveDate,
    pub city: String,
    pub timezone: String,
    pub summary: DaySummary,
    pub cells: Vec<GridCell>,
}

pub fn admin_grid(resolver: &SlotResolver<'_>, snapshot: &BookingSnapshot, dates: &[NaiveDate]) -> Vec<GridDay> {
    let timezones = resolver.timezones();
    let recurring = expand_recurring(&snapshot.settings.recurring, dates, |d| timezones.active_timezone(d, ""));
    let store = BlockStore::from_ranges(resolver.store().iter().cloned().chain(recurring));
    let first_cells = booking_first_cells(&store);

    dates
        .iter()
        .map(|&date| GridDay {
            date,
            city: snapshot.tour.city_for_date(date).to_string(),
            timezone: timezones.active_timezone(date, "").name().to_string(),
            summary: day_summary(&store, date),
            cells: day_cells()
                .map(|minute| grid_cell(&store, &first_cells, date, minute))
                .collect(),
        })
        .collect()
}

fn grid_cell(
    store: &BlockStore,
    first_cells: &HashMap<String, (NaiveDate, TimeOfDay)>,
    date: NaiveDate,
    minute: u32,
) -> GridCell {
    let start = TimeOfDay::clamped(minute as i64);
    let end = TimeOfDay::clamped((minute + SLOT_MINUTES) as i64);
    let Some(range) = store.cell(date, minute) else {
        return GridCell {
            start,
            end,
            kind: None,
            reason: String::new(),
            label: None,
            booking_id: None,
            booking_status: None,
            tentative: false,
        };
    };

    // a booking's name is printed once, on its first cell
    let label = booking_key(range)
        .filter(|key| first_cells.get(key.as_str()) == Some(&(date, range.start)))
        .and(range.label.clone());

    GridCell {
        start,
        end,
        kind: Some(range.kind),
        reason: range.reason.clone(),
        label,
        booking_id: range.booking_id.clone(),
        booking_status: range.booking_status.clone(),
        tentative: range.is_soft(),
    }
}

fn booking_key(range: &BlockedRange) -> Option<String> {
    if range.kind != BlockKind::Booking {
        return None;
    }
    range.booking_id.clone().or_else(|| range.label.clone())
}

fn booking_first_cells(store: &BlockStore) -> HashMap<String, (NaiveDate, TimeOfDay)> {
    let mut map: HashMap<String, (NaiveDate, TimeOfDay)> = HashMap::new();
    for range in store.iter() {
        let Some(key) = booking_key(range) else {
            continue;
        };
        let at = (range.date, range.start);
        map.entry(key)
            .and_modify(|first| *first = (*first).min(at))
            .or_insert(at);
    }
    map
}

pub fn day_summary(store: &BlockStore, date: NaiveDate) -> DaySummary {
    let mut bookings = HashSet::new();
    let mut paid = HashSet::new();
    let mut summary = DaySummary::default();

    for range in store.on_date(date) {
        match range.kind {
            BlockKind::Booking => {
                let key = range
                    .booking_id
                    .clone()
                    .unwrap_or_else(|| format!("{}-{}", range.label.as_deref().unwrap_or(""), range.start));
                if range.booking_status.as_deref() == Some("paid") {
                    paid.insert(key.clone());
                }
                bookings.insert(key);
            }
            BlockKind::Recurring => summary.recurring = true,
            BlockKind::Manual | BlockKind::Template => summary.manual = true,
        }
    }

    summary.bookings = bookings.len();
    summary.paid = paid.len();
    summary
}
