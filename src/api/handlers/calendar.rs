use axum::{
    extract::{State, Path},
    http::header,
    response::IntoResponse,
};
use crate::state::AppState;
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("Missing id".into()));
    }

    let request = state.request_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Booking request not found".into()))?;
    let settings = state.availability_repo.load().await?;

    let ics = generate_ics(&request, &settings.tour_timezone)
        .ok_or(AppError::Validation("Invalid booking data".into()))?;

    info!(booking_id = %id, "exported booking calendar");
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"booking-{}.ics\"", id)),
        ],
        ics,
    ))
}
