use chrono::{Days, NaiveDate};

pub use crate::domain::models::time::{MINUTES_PER_DAY, SLOT_MINUTES};

pub fn time_to_minutes(value: &str) -> Option<u32> {
    let (hour, minute) = value.trim().split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    Some(hour * 60 + minute)
}

pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // strict YYYY-MM-DD, chrono alone would accept single-digit fields
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn date_range(start_key: &str, end_key: &str) -> Vec<NaiveDate> {
    match (parse_date_key(start_key), parse_date_key(end_key)) {
        (Some(start), Some(end)) => dates_between(start, end),
        _ => Vec::new(),
    }
}

pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

pub fn week_dates(start: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take(7).collect()
}

pub fn day_cells() -> impl Iterator<Item = u32> {
    (0..MINUTES_PER_DAY).step_by(SLOT_MINUTES as usize)
}
