use crate::domain::models::block::BlockedRange;
use crate::domain::models::time::TimeOfDay;
use crate::domain::models::tour::TourStop;
use crate::domain::services::render::GridDay;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct SlotCheckResponse {
    pub ok: bool,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub timezone: String,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub start: NaiveDate,
    pub days: Vec<GridDay>,
}

#[derive(Serialize)]
pub struct TemplateBlocksResponse {
    pub count: usize,
    pub blocks: Vec<BlockedRange>,
}

#[derive(Serialize)]
pub struct TourValidateResponse {
    pub ok: bool,
    pub touring: Vec<TourStop>,
}
