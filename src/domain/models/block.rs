use crate::domain::models::time::{lenient_flag, lenient_time, TimeOfDay};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Manual,
    Template,
    Recurring,
    Booking,
}

impl BlockKind {
    pub fn rank(&self) -> u8 {
        match self {
            BlockKind::Booking => 3,
            BlockKind::Template | BlockKind::Manual => 2,
            BlockKind::Recurring => 1,
        }
    }
}

fn kind_or_manual<'de, D>(deserializer: D) -> Result<BlockKind, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        Some("template") => BlockKind::Template,
        Some("recurring") => BlockKind::Recurring,
        Some("booking") => BlockKind::Booking,
        _ => BlockKind::Manual,
    })
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BlockedRange {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default, deserialize_with = "kind_or_manual")]
    pub kind: BlockKind,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub booking_status: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BlockedRange {
    pub fn new(date: NaiveDate, start: TimeOfDay, end: TimeOfDay, kind: BlockKind, reason: &str) -> Self {
        Self {
            date,
            start,
            end,
            kind,
            reason: reason.to_string(),
            city: String::new(),
            booking_id: None,
            booking_status: None,
            booking_type: None,
            label: None,
        }
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = city.to_string();
        self
    }

    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        start < self.end.minutes() && end > self.start.minutes()
    }

    pub fn is_soft(&self) -> bool {
        self.kind == BlockKind::Booking
            && matches!(self.booking_status.as_deref(), Some("pending") | Some("maybe"))
    }

    pub fn display_rank(&self) -> u8 {
        if self.is_soft() {
            // over manual/template blocks, under confirmed bookings
            return 6;
        }
        self.kind.rank() * 2 + 1
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecurringBlock {
    #[serde(default)]
    pub days: Vec<u32>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub all_day: bool,
    #[serde(default, deserialize_with = "lenient_time")]
    pub start: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub end: Option<TimeOfDay>,
    #[serde(default)]
    pub reason: String,
}

impl RecurringBlock {
    pub fn applies_to(&self, weekday_index: u32) -> bool {
        self.days.contains(&weekday_index)
    }

    pub fn window(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        if self.all_day {
            return Some((TimeOfDay::MIDNIGHT, TimeOfDay::END_OF_DAY));
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) if end > start => Some((start, end)),
            _ => None,
        }
    }

    pub fn intersects(&self, weekday_index: u32, start: u32, end: u32) -> bool {
        if !self.applies_to(weekday_index) {
            return false;
        }
        self.window()
            .is_some_and(|(s, e)| start < e.minutes() && end > s.minutes())
    }
}
