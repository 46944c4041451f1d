use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::models::availability::AvailabilitySettings;
use crate::state::AppState;
use crate::infra::clock::SystemClock;
use crate::infra::repositories::{json_file_repo::JsonFileRepo, memory_repo::MemoryRepo};

pub fn bootstrap_state(config: &Config) -> AppState {
    if config.data_dir.is_dir() {
        info!("Reading booking data from {}", config.data_dir.display());
        let repo = Arc::new(JsonFileRepo::new(config));
        return AppState {
            config: config.clone(),
            availability_repo: repo.clone(),
            tour_repo: repo.clone(),
            request_repo: repo,
            clock: Arc::new(SystemClock),
        };
    }

    warn!(
        "Data directory {} not found, serving configured defaults from memory",
        config.data_dir.display()
    );
    let settings = AvailabilitySettings {
        tour_city: config.default_tour_city.clone(),
        tour_timezone: config.default_tour_tz.clone(),
        buffer_minutes: config.default_buffer_minutes,
        ..AvailabilitySettings::default()
    };
    let repo = Arc::new(MemoryRepo::new(settings, Vec::new(), Vec::new()));
    AppState {
        config: config.clone(),
        availability_repo: repo.clone(),
        tour_repo: repo.clone(),
        request_repo: repo,
        clock: Arc::new(SystemClock),
    }
}
