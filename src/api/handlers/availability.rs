use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::SlotCheckRequest, responses::SlotCheckResponse};
use crate::domain::models::session_length::SessionLength;
use crate::domain::models::time::TimeOfDay;
use crate::domain::services::availability::SlotResolver;
use crate::domain::services::render::client_day_view;
use crate::domain::services::time_grid::parse_date_key;
use crate::error::AppError;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    parse_date_key(value).ok_or(AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

fn parse_length(value: &str) -> Result<SessionLength, AppError> {
    SessionLength::from_option(value).ok_or(AppError::Validation("Invalid duration".into()))
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.availability_repo.load().await?;
    Ok(Json(settings))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let date_str = params.get("date").ok_or(AppError::Validation("Date required".into()))?;
    let date = parse_date(date_str)?;
    let duration = params.get("duration").ok_or(AppError::Validation("Duration required".into()))?;
    let length = parse_length(duration)?;
    let city = params.get("city").map(String::as_str).unwrap_or("");

    let snapshot = state.load_snapshot().await?;
    let resolver = SlotResolver::new(&snapshot, state.clock.now());
    let view = client_day_view(&resolver, &snapshot, date, city, length);

    info!(
        %date,
        city = %view.city,
        status = view.status,
        slots = view.slots.len(),
        "served day view"
    );
    Ok(Json(view))
}

pub async fn check_slot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SlotCheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&payload.date)?;
    let start = TimeOfDay::parse(&payload.time)
        .filter(|t| *t < TimeOfDay::END_OF_DAY)
        .ok_or(AppError::Validation("Invalid time format (HH:MM)".into()))?;
    let length = parse_length(&payload.duration)?;

    let snapshot = state.load_snapshot().await?;
    let resolver = SlotResolver::new(&snapshot, state.clock.now());

    resolver
        .check_start(date, start, &payload.city, length)
        .map_err(|rejection| {
            warn!(%date, time = %start, city = %payload.city, reason = %rejection, "booking time rejected");
            AppError::from(rejection)
        })?;

    let ctx = resolver.day(date, &payload.city);
    let minutes = length.minutes().unwrap_or_default();
    info!(%date, time = %start, zone = %ctx.zone, "booking time accepted");

    Ok(Json(SlotCheckResponse {
        ok: true,
        date,
        start,
        end: TimeOfDay::clamped(start.minutes() as i64 + minutes as i64),
        timezone: ctx.zone.name().to_string(),
    }))
}
