use crate::domain::models::availability::DEFAULT_TOUR_TZ;
use crate::domain::models::schedule::{CityScheduleTemplate, MAX_BUFFER_MINUTES};
use crate::domain::models::time::TimeOfDay;
use crate::domain::models::tour::{normalize_city_name, StopKind, TourStop};
use crate::domain::services::time_grid::dates_between;
use crate::domain::services::timezone::parse_zone;
use crate::domain::services::tour_calendar::TourCalendar;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

pub const MAX_NOTES_CHARS: usize = 300;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TourError {
    #[error("No valid entries")]
    NoValidEntries,
    #[error("{first} overlaps {second}")]
    Overlap { first: String, second: String },
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawTourStop {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub notes: String,
}

pub fn normalize_tour_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let parts: Vec<&str> = value.split(['-', '/']).collect();
    if parts.len() != 3 || !parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let slash = value.contains('/');
    let (year, month, day) = match (parts[0].len(), parts[1].len(), parts[2].len()) {
        (4, 2, 2) if !slash => (parts[0], parts[1], parts[2]),
        (4, 1..=2, 1..=2) if slash => (parts[0], parts[1], parts[2]),
        (1..=2, 1..=2, 4) => (parts[2], parts[0], parts[1]),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn stop_label(stop: &TourStop) -> String {
    format!("{} ({} to {})", stop.city, stop.start, stop.end)
}

pub fn normalize_tour(entries: &[RawTourStop]) -> Result<Vec<TourStop>, TourError> {
    let mut clean: Vec<TourStop> = entries
        .iter()
        .filter_map(|entry| {
            let city = entry.city.trim();
            let start = normalize_tour_date(&entry.start)?;
            let end = normalize_tour_date(&entry.end)?;
            if city.is_empty() || start > end {
                return None;
            }
            Some(TourStop {
                city: city.to_string(),
                start,
                end,
                kind: StopKind::parse(&entry.kind),
                notes: entry.notes.trim().chars().take(MAX_NOTES_CHARS).collect(),
            })
        })
        .collect();

    if clean.is_empty() {
        return Err(TourError::NoValidEntries);
    }

    clean.sort_by(|a, b| {
        (a.start, a.end, a.city.to_lowercase(), a.kind.as_str()).cmp(&(b.start, b.end, b.city.to_lowercase(), b.kind.as_str()))
    });

    let calendar = TourCalendar::new(clean);
    if let Some(&(first, second)) = calendar.overlaps().first() {
        let stops = calendar.stops();
        return Err(TourError::Overlap {
            first: stop_label(&stops[first]),
            second: stop_label(&stops[second]),
        });
    }
    Ok(calendar.into_stops())
}

pub fn city_timezone(city: &str) -> Option<&'static str> {
    match normalize_city_name(city).as_str() {
        "montreal" | "toronto" => Some("America/Toronto"),
        "vancouver" => Some("America/Vancouver"),
        "london" | "london (uk)" => Some("Europe/London"),
        "berlin" => Some("Europe/Berlin"),
        "paris" => Some("Europe/Paris"),
        _ => None,
    }
}

fn default_window(value: Option<TimeOfDay>, fallback: &str) -> Option<TimeOfDay> {
    value.or_else(|| TimeOfDay::parse(fallback))
}

fn clean_days(days: Option<Vec<NaiveDate>>, all: &[NaiveDate]) -> Vec<NaiveDate> {
    match days {
        None => all.to_vec(),
        Some(mut days) => {
            days.retain(|d| all.contains(d));
            days.sort();
            days.dedup();
            days
        }
    }
}

pub fn sanitize_schedules(
    schedules: Vec<CityScheduleTemplate>,
    default_buffer: u32,
    default_zone: &str,
) -> Vec<CityScheduleTemplate> {
    schedules
        .into_iter()
        .filter(|s| !s.city.trim().is_empty() && s.start <= s.end)
        .map(|mut s| {
            s.city = s.city.trim().to_string();
            s.buffer_minutes = Some(s.buffer_minutes.unwrap_or(default_buffer).min(MAX_BUFFER_MINUTES));

            if parse_zone(&s.timezone).is_none() {
                s.timezone = city_timezone(&s.city)
                    .map(str::to_string)
                    .or_else(|| parse_zone(default_zone).map(|z| z.name().to_string()))
                    .unwrap_or_else(|| DEFAULT_TOUR_TZ.to_string());
            }

            let all = dates_between(s.start, s.end);
            if s.has_sleep {
                s.sleep_days = Some(clean_days(s.sleep_days.take(), &all));
                s.sleep_start = default_window(s.sleep_start, "02:00");
                s.sleep_end = default_window(s.sleep_end, "10:00");
            } else {
                s.sleep_days = Some(Vec::new());
            }
            if s.has_break {
                s.break_days = Some(clean_days(s.break_days.take(), &all));
                s.break_start = default_window(s.break_start, "16:00");
                s.break_end = default_window(s.break_end, "17:00");
            } else {
                s.break_days = Some(Vec::new());
            }
            s
        })
        .collect()
}
