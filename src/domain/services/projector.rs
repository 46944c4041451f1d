use crate::domain::models::block::{BlockKind, BlockedRange};
use crate::domain::models::booking::BookingRequest;
use crate::domain::models::time::TimeOfDay;
use crate::domain::services::block_store::split_into_cells;
use crate::domain::services::time_grid::parse_date_key;
use chrono::NaiveDate;

pub const BOOKING_REASON: &str = "Booking";

pub fn project(requests: &[BookingRequest], hidden_ids: &[String]) -> Vec<BlockedRange> {
    let mut cells = Vec::new();
    for request in requests {
        if hidden_ids.iter().any(|id| id.trim() == request.id.trim()) {
            continue;
        }
        match project_one(request) {
            Some(range) => cells.extend(split_into_cells(&range)),
            None => tracing::debug!(booking_id = %request.id, "booking request not projected"),
        }
    }
    cells
}

fn project_one(request: &BookingRequest) -> Option<BlockedRange> {
    let confirmation = request.confirmation()?;
    let (date, start) = request_start(request)?;
    let minutes = request.duration_minutes()?;
    if start >= TimeOfDay::END_OF_DAY {
        return None;
    }
    // bookings running past midnight are cut at the end of their own day
    let end = TimeOfDay::clamped(start.minutes() as i64 + minutes as i64);

    let mut range = BlockedRange::new(date, start, end, BlockKind::Booking, BOOKING_REASON).with_city(request.city.trim());
    range.booking_id = Some(request.id.trim().to_string()).filter(|id| !id.is_empty());
    range.booking_status = Some(confirmation.as_str().to_string());
    range.booking_type = Some(request.booking_type.trim().to_string()).filter(|t| !t.is_empty());
    range.label = Some(request.label());
    Some(range)
}

pub fn request_start(request: &BookingRequest) -> Option<(NaiveDate, TimeOfDay)> {
    let date = parse_date_key(&request.preferred_date)?;
    let raw = request.preferred_time.trim();
    let time = match raw.len() {
        8 => TimeOfDay::parse(raw.get(..5)?),
        _ => TimeOfDay::parse(raw),
    }?;
    Some((date, time))
}
