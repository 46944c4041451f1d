use crate::domain::models::time::{lenient_dates, lenient_flag, lenient_minutes, lenient_time, TimeOfDay};
use crate::domain::models::tour::normalize_city_name;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_BUFFER_MINUTES: u32 = 240;

/// Working-hour template for one stop of the tour.
///
/// `sleep_days` / `break_days` left as `None` mean "every date of the stop"
/// when the matching flag is on; an explicit empty list disables the window.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityScheduleTemplate {
    pub city: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub timezone: String,
    #[serde(default, deserialize_with = "lenient_time")]
    pub ready_start: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub leave_day_end: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub buffer_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_sleep: bool,
    #[serde(default, deserialize_with = "lenient_dates")]
    pub sleep_days: Option<Vec<NaiveDate>>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub sleep_start: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub sleep_end: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_break: bool,
    #[serde(default, deserialize_with = "lenient_dates")]
    pub break_days: Option<Vec<NaiveDate>>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub break_start: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub break_end: Option<TimeOfDay>,
}

impl CityScheduleTemplate {
    pub fn new(city: &str, start: NaiveDate, end: NaiveDate, timezone: &str) -> Self {
        Self {
            city: city.to_string(),
            start,
            end,
            timezone: timezone.to_string(),
            ready_start: None,
            leave_day_end: None,
            buffer_minutes: None,
            has_sleep: false,
            sleep_days: None,
            sleep_start: None,
            sleep_end: None,
            has_break: false,
            break_days: None,
            break_start: None,
            break_end: None,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn matches_city(&self, city: &str) -> bool {
        normalize_city_name(&self.city) == normalize_city_name(city)
    }

    pub fn buffer(&self) -> Option<u32> {
        self.buffer_minutes.map(|b| b.min(MAX_BUFFER_MINUTES))
    }

    pub fn sleeps_on(&self, date: NaiveDate) -> bool {
        self.has_sleep && applies_on(self.sleep_days.as_deref(), date)
    }

    pub fn breaks_on(&self, date: NaiveDate) -> bool {
        self.has_break && applies_on(self.break_days.as_deref(), date)
    }
}

fn applies_on(days: Option<&[NaiveDate]>, date: NaiveDate) -> bool {
    match days {
        None => true,
        Some(days) => days.contains(&date),
    }
}
