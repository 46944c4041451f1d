use tour_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::memory_repo::MemoryRepo,
    domain::ports::Clock,
    domain::models::{
        availability::AvailabilitySettings,
        booking::BookingRequest,
        schedule::CityScheduleTemplate,
        time::TimeOfDay,
        tour::TourStop,
    },
};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Fixtures are dated March 2031; requests are served as of 2031-03-01 noon UTC.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[allow(dead_code)]
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 3, 1, 12, 0, 0).unwrap()
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepo>,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        Self::with_data(AvailabilitySettings::default(), Vec::new(), Vec::new())
    }

    pub fn with_data(settings: AvailabilitySettings, stops: Vec<TourStop>, requests: Vec<BookingRequest>) -> Self {
        Self::at(fixture_now(), settings, stops, requests)
    }

    pub fn at(
        now: DateTime<Utc>,
        settings: AvailabilitySettings,
        stops: Vec<TourStop>,
        requests: Vec<BookingRequest>,
    ) -> Self {
        let repo = Arc::new(MemoryRepo::new(settings, stops, requests));
        let state = Arc::new(AppState {
            config: Config::default(),
            availability_repo: repo.clone(),
            tour_repo: repo.clone(),
            request_repo: repo.clone(),
            clock: Arc::new(FixedClock(now)),
        });
        let router = create_router(state.clone());

        Self { router, repo, state }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
        ).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get_raw(&self, uri: &str) -> (StatusCode, HeaderMap, String) {
        let response = self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
        ).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[allow(dead_code)]
pub fn time(s: &str) -> TimeOfDay {
    TimeOfDay::parse(s).unwrap()
}

/// Toronto stop 2031-03-10..14 with working hours 10:00-18:00, a 15 minute
/// buffer and one paid booking 12:00-13:00 on 2031-03-11.
#[allow(dead_code)]
pub fn toronto_fixture() -> (AvailabilitySettings, Vec<TourStop>, Vec<BookingRequest>) {
    let mut schedule = CityScheduleTemplate::new("Toronto", date("2031-03-10"), date("2031-03-14"), "America/Toronto");
    schedule.ready_start = Some(time("10:00"));
    schedule.leave_day_end = Some(time("18:00"));
    schedule.buffer_minutes = Some(15);

    let settings = AvailabilitySettings {
        tour_city: "Toronto".to_string(),
        city_schedules: vec![schedule],
        ..AvailabilitySettings::default()
    };
    let stops = vec![TourStop::new("Toronto", date("2031-03-10"), date("2031-03-14"))];
    let requests = vec![BookingRequest {
        id: "req-paid".to_string(),
        preferred_date: "2031-03-11".to_string(),
        preferred_time: "12:00".to_string(),
        duration_hours: Some(1.0),
        status: "accepted".to_string(),
        payment_status: "paid".to_string(),
        city: "Toronto".to_string(),
        booking_type: "incall".to_string(),
        name: "Robin Example".to_string(),
        tour_timezone: "America/Toronto".to_string(),
    }];
    (settings, stops, requests)
}

#[allow(dead_code)]
pub fn toronto_app() -> TestApp {
    let (settings, stops, requests) = toronto_fixture();
    TestApp::with_data(settings, stops, requests)
}
