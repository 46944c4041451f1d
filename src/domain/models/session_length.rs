use crate::domain::models::time::SLOT_MINUTES;
use serde::{Deserialize, Serialize};

pub const LONG_SESSION_MAX_HOURS: f64 = 12.0;
const LONG_SESSION_HOURS: f64 = 10.0;
const SOCIAL_HOURS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "minutes", rename_all = "snake_case")]
pub enum SessionLength {
    Minutes(u32),
    Custom,
}

impl SessionLength {
    pub fn from_option(value: &str) -> Option<Self> {
        match value.trim() {
            "24+" => Some(SessionLength::Custom),
            "social" => Self::from_hours(SOCIAL_HOURS),
            "8-12" => Self::from_hours(LONG_SESSION_HOURS),
            other => Self::from_hours(other.parse().ok()?),
        }
    }

    pub fn from_hours(hours: f64) -> Option<Self> {
        if !hours.is_finite() || hours <= 0.0 {
            return None;
        }
        if hours > LONG_SESSION_MAX_HOURS {
            return Some(SessionLength::Custom);
        }
        let minutes = (hours * 60.0).round() as u32;
        let cells = minutes.div_ceil(SLOT_MINUTES).max(1);
        Some(SessionLength::Minutes(cells * SLOT_MINUTES))
    }

    pub fn minutes(&self) -> Option<u32> {
        match self {
            SessionLength::Minutes(m) => Some(*m),
            SessionLength::Custom => None,
        }
    }
}
