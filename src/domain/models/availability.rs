use crate::domain::models::block::{BlockedRange, RecurringBlock};
use crate::domain::models::schedule::{CityScheduleTemplate, MAX_BUFFER_MINUTES};
use crate::domain::models::time::{lenient_flag, lenient_vec};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TOUR_CITY: &str = "Touring city not set";
pub const DEFAULT_TOUR_TZ: &str = "America/Toronto";
pub const DEFAULT_BUFFER_MINUTES: u32 = 30;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityMode {
    #[default]
    Open,
    Closed,
}

fn mode_or_open<'de, D>(deserializer: D) -> Result<AvailabilityMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw.as_ref().and_then(|v| v.as_str()).map(str::trim) {
        Some("closed") => AvailabilityMode::Closed,
        _ => AvailabilityMode::Open,
    })
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

fn city_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(deserializer)?.unwrap_or_else(default_city))
}

fn zone_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(deserializer)?.unwrap_or_else(default_tz))
}

fn clamped_buffer<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = crate::domain::models::time::lenient_minutes(deserializer)?;
    Ok(raw.unwrap_or(DEFAULT_BUFFER_MINUTES).min(MAX_BUFFER_MINUTES))
}

fn default_buffer() -> u32 {
    DEFAULT_BUFFER_MINUTES
}

fn default_city() -> String {
    DEFAULT_TOUR_CITY.to_string()
}

fn default_tz() -> String {
    DEFAULT_TOUR_TZ.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AvailabilitySettings {
    #[serde(default = "default_city", deserialize_with = "city_or_default")]
    pub tour_city: String,
    #[serde(default = "default_tz", deserialize_with = "zone_or_default")]
    pub tour_timezone: String,
    #[serde(default = "default_buffer", deserialize_with = "clamped_buffer")]
    pub buffer_minutes: u32,
    #[serde(default, deserialize_with = "mode_or_open")]
    pub availability_mode: AvailabilityMode,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub blocked: Vec<BlockedRange>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub recurring: Vec<RecurringBlock>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub city_schedules: Vec<CityScheduleTemplate>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub auto_template_blocks: bool,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub hidden_booking_ids: Vec<String>,
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            tour_city: default_city(),
            tour_timezone: default_tz(),
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            availability_mode: AvailabilityMode::Open,
            blocked: Vec::new(),
            recurring: Vec::new(),
            city_schedules: Vec::new(),
            auto_template_blocks: false,
            hidden_booking_ids: Vec::new(),
        }
    }
}

impl AvailabilitySettings {
    pub fn is_hidden(&self, booking_id: &str) -> bool {
        self.hidden_booking_ids.iter().any(|id| id.trim() == booking_id)
    }
}
