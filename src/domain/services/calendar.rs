use crate::domain::models::booking::BookingRequest;
use crate::domain::services::projector::request_start;
use crate::domain::services::timezone::parse_zone;
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

pub const EVENT_SUMMARY: &str = "Tour booking";

pub fn generate_ics(request: &BookingRequest, fallback_zone: &str) -> Option<String> {
    let (date, start) = request_start(request)?;
    let minutes = request.duration_minutes()?;
    let zone = parse_zone(&request.tour_timezone)
        .or_else(|| parse_zone(fallback_zone))
        .unwrap_or(chrono_tz::UTC);

    let time = NaiveTime::from_hms_opt(start.minutes() / 60, start.minutes() % 60, 0)?;
    let starts = zone.from_local_datetime(&date.and_time(time)).earliest()?.with_timezone(&Utc);
    let ends = starts + Duration::minutes(minutes as i64);

    let location = [request.city.trim().to_string(), capitalize(request.booking_type.trim())]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ");

    let mut event = IcalEvent::new();
    event
        .summary(EVENT_SUMMARY)
        .description(&format!("Reference: {}", request.id))
        .starts(starts)
        .ends(ends)
        .uid(&format!("{}@tour-booking", request.id));
    if !location.is_empty() {
        event.location(&location);
    }

    let mut calendar = Calendar::new();
    calendar.push(event.done());
    Some(calendar.to_string())
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
