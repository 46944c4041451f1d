use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::TourValidateRequest,
    responses::{CalendarResponse, TemplateBlocksResponse, TourValidateResponse},
};
use crate::api::handlers::availability::parse_date;
use crate::domain::services::availability::SlotResolver;
use crate::domain::services::block_store::normalize;
use crate::domain::services::render::admin_grid;
use crate::domain::services::template::generate_all;
use crate::domain::services::time_grid::week_dates;
use crate::domain::services::validation::normalize_tour;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub const MAX_CALENDAR_DAYS: usize = 31;

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.load_snapshot().await?;
    let now = state.clock.now();

    let start = match params.get("start") {
        Some(value) => parse_date(value)?,
        None => {
            let zone = snapshot.timezone_context().default_timezone();
            now.with_timezone(&zone).date_naive()
        }
    };
    let dates = match params.get("days") {
        None => week_dates(start),
        Some(value) => {
            let days: usize = value
                .trim()
                .parse()
                .ok()
                .filter(|d| (1..=MAX_CALENDAR_DAYS).contains(d))
                .ok_or(AppError::Validation(format!("days must be between 1 and {}", MAX_CALENDAR_DAYS)))?;
            start.iter_days().take(days).collect()
        }
    };

    let resolver = SlotResolver::new(&snapshot, now);
    let days = admin_grid(&resolver, &snapshot, &dates);
    info!(%start, days = days.len(), "rendered admin calendar");

    Ok(Json(CalendarResponse { start, days }))
}

pub async fn get_template_blocks(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.load_snapshot().await?;
    let blocks = normalize(generate_all(&snapshot.settings.city_schedules));

    Ok(Json(TemplateBlocksResponse {
        count: blocks.len(),
        blocks,
    }))
}

pub async fn validate_tour(
    Json(payload): Json<TourValidateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let touring = normalize_tour(&payload.touring)?;
    info!(stops = touring.len(), "validated touring schedule");

    Ok(Json(TourValidateResponse { ok: true, touring }))
}
