use crate::domain::models::{availability::AvailabilitySettings, booking::BookingRequest, tour::TourStop};
use crate::domain::ports::{AvailabilityRepository, BookingRequestRepository, TourRepository};
use crate::error::AppError;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Holds the three documents in memory. Used by tests and for running the
/// service without a data directory.
#[derive(Default)]
pub struct MemoryRepo {
    settings: RwLock<AvailabilitySettings>,
    stops: RwLock<Vec<TourStop>>,
    requests: RwLock<Vec<BookingRequest>>,
}

impl MemoryRepo {
    pub fn new(settings: AvailabilitySettings, stops: Vec<TourStop>, requests: Vec<BookingRequest>) -> Self {
        Self {
            settings: RwLock::new(settings),
            stops: RwLock::new(stops),
            requests: RwLock::new(requests),
        }
    }

    pub async fn push_request(&self, request: BookingRequest) {
        self.requests.write().await.push(request);
    }
}

#[async_trait]
impl AvailabilityRepository for MemoryRepo {
    async fn load(&self) -> Result<AvailabilitySettings, AppError> {
        Ok(self.settings.read().await.clone())
    }
}

#[async_trait]
impl TourRepository for MemoryRepo {
    async fn list_stops(&self) -> Result<Vec<TourStop>, AppError> {
        Ok(self.stops.read().await.clone())
    }
}

#[async_trait]
impl BookingRequestRepository for MemoryRepo {
    async fn list(&self) -> Result<Vec<BookingRequest>, AppError> {
        Ok(self.requests.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BookingRequest>, AppError> {
        Ok(self.requests.read().await.iter().find(|r| r.id == id).cloned())
    }
}
