use crate::domain::models::availability::{DEFAULT_BUFFER_MINUTES, DEFAULT_TOUR_CITY, DEFAULT_TOUR_TZ};
use crate::domain::models::schedule::MAX_BUFFER_MINUTES;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_dir: String,
    pub default_tour_city: String,
    pub default_tour_tz: String,
    pub default_buffer_minutes: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string())),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
            default_tour_city: env::var("DEFAULT_TOUR_CITY").unwrap_or_else(|_| DEFAULT_TOUR_CITY.to_string()),
            default_tour_tz: env::var("DEFAULT_TOUR_TZ").unwrap_or_else(|_| DEFAULT_TOUR_TZ.to_string()),
            default_buffer_minutes: env::var("DEFAULT_BUFFER_MINUTES")
                .ok()
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(DEFAULT_BUFFER_MINUTES)
                .min(MAX_BUFFER_MINUTES),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("./data"),
            log_dir: "./logs".to_string(),
            default_tour_city: DEFAULT_TOUR_CITY.to_string(),
            default_tour_tz: DEFAULT_TOUR_TZ.to_string(),
            default_buffer_minutes: DEFAULT_BUFFER_MINUTES,
        }
    }
}
