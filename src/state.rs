use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{AvailabilityRepository, BookingRequestRepository, Clock, TourRepository};
use crate::domain::services::snapshot::BookingSnapshot;
use crate::error::AppError;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub tour_repo: Arc<dyn TourRepository>,
    pub request_repo: Arc<dyn BookingRequestRepository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Reads the three documents once; handlers compute everything for the
    /// request from the returned snapshot.
    pub async fn load_snapshot(&self) -> Result<BookingSnapshot, AppError> {
        let (settings, stops, requests) = tokio::try_join!(
            self.availability_repo.load(),
            self.tour_repo.list_stops(),
            self.request_repo.list(),
        )?;
        debug!(
            stops = stops.len(),
            requests = requests.len(),
            blocked = settings.blocked.len(),
            "loaded booking snapshot"
        );
        Ok(BookingSnapshot::new(settings, stops, requests))
    }
}
