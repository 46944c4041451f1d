use crate::domain::models::{availability::AvailabilitySettings, booking::BookingRequest, tour::TourStop};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn load(&self) -> Result<AvailabilitySettings, AppError>;
}

#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn list_stops(&self) -> Result<Vec<TourStop>, AppError>;
}

#[async_trait]
pub trait BookingRequestRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<BookingRequest>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<BookingRequest>, AppError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
