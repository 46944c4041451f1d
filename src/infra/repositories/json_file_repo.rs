use crate::config::Config;
use crate::domain::models::{availability::AvailabilitySettings, booking::BookingRequest, time::lenient_vec, tour::TourStop};
use crate::domain::ports::{AvailabilityRepository, BookingRequestRepository, TourRepository};
use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const AVAILABILITY_FILE: &str = "availability.json";
pub const SITE_CONTENT_FILE: &str = "site-content.json";
pub const REQUESTS_FILE: &str = "requests.json";

#[derive(Deserialize, Default)]
struct SiteContent {
    #[serde(default, deserialize_with = "lenient_vec")]
    touring: Vec<TourStop>,
}

#[derive(Deserialize, Default)]
struct RequestStore {
    #[serde(default, deserialize_with = "lenient_vec")]
    requests: Vec<BookingRequest>,
}

/// Read-only view over the JSON documents the booking site keeps in its
/// data directory. Every call reads the files again, so each request sees
/// whatever was last written.
pub struct JsonFileRepo {
    data_dir: PathBuf,
    defaults: Value,
}

impl JsonFileRepo {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            defaults: json!({
                "tour_city": config.default_tour_city,
                "tour_timezone": config.default_tour_tz,
                "buffer_minutes": config.default_buffer_minutes,
            }),
        }
    }

    /// `None` for a missing file. A file that is not valid JSON is treated
    /// the same way, with a warning.
    async fn read_document(&self, name: &str) -> Result<Option<Value>, AppError> {
        let path = self.data_dir.join(name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "data file missing, using defaults");
                return Ok(None);
            }
            Err(e) => return Err(AppError::Io(e)),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable data file, using defaults");
                Ok(None)
            }
        }
    }
}

/// Overlays the stored keys onto the configured defaults. Nulls, blank
/// strings and values whose JSON type differs from a string default keep
/// the default.
fn with_defaults(defaults: &Value, stored: Option<Value>) -> Value {
    let mut merged = defaults.clone();
    if let (Some(target), Some(Value::Object(stored))) = (merged.as_object_mut(), stored) {
        for (key, value) in stored {
            let keep_default = match target.get(&key) {
                Some(Value::String(_)) => value.as_str().is_none_or(|s| s.trim().is_empty()),
                Some(_) => value.is_null(),
                None => false,
            };
            if !keep_default {
                target.insert(key, value);
            }
        }
    }
    merged
}

#[async_trait]
impl AvailabilityRepository for JsonFileRepo {
    async fn load(&self) -> Result<AvailabilitySettings, AppError> {
        let stored = self.read_document(AVAILABILITY_FILE).await?;
        match serde_json::from_value(with_defaults(&self.defaults, stored)) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(file = AVAILABILITY_FILE, error = %e, "availability settings unreadable, using defaults");
                Ok(serde_json::from_value(with_defaults(&self.defaults, None))?)
            }
        }
    }
}

#[async_trait]
impl TourRepository for JsonFileRepo {
    async fn list_stops(&self) -> Result<Vec<TourStop>, AppError> {
        let content: SiteContent = match self.read_document(SITE_CONTENT_FILE).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => SiteContent::default(),
        };
        Ok(content.touring)
    }
}

#[async_trait]
impl BookingRequestRepository for JsonFileRepo {
    async fn list(&self) -> Result<Vec<BookingRequest>, AppError> {
        let store: RequestStore = match self.read_document(REQUESTS_FILE).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => RequestStore::default(),
        };
        Ok(store.requests)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BookingRequest>, AppError> {
        let requests = self.list().await?;
        Ok(requests.into_iter().find(|r| r.id == id))
    }
}
