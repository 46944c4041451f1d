use crate::domain::models::time::lenient_vec;
use crate::domain::services::validation::RawTourStop;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SlotCheckRequest {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub city: String,
    pub duration: String,
}

#[derive(Deserialize)]
pub struct TourValidateRequest {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub touring: Vec<RawTourStop>,
}
