use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const FLY_ME_TO_YOU: &str = "fly me to you";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    #[default]
    Tour,
    Block,
}

impl StopKind {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("block") {
            StopKind::Block
        } else {
            StopKind::Tour
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StopKind::Tour => "tour",
            StopKind::Block => "block",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TourStop {
    pub city: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: StopKind,
    #[serde(default)]
    pub notes: String,
}

impl TourStop {
    pub fn new(city: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            city: city.to_string(),
            start,
            end,
            kind: StopKind::Tour,
            notes: String::new(),
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &TourStop) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

pub fn normalize_city_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

pub fn is_fly_me_city(value: &str) -> bool {
    normalize_city_name(value) == FLY_ME_TO_YOU
}
