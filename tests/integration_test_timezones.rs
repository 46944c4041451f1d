mod common;

use axum::http::StatusCode;
use common::{date, time, toronto_fixture, TestApp};
use serde_json::json;
use tour_booking::domain::models::{booking::BookingRequest, schedule::CityScheduleTemplate, tour::TourStop};

fn with_vancouver_leg() -> TestApp {
    let (mut settings, mut stops, requests) = toronto_fixture();
    let mut vancouver = CityScheduleTemplate::new("Vancouver", date("2031-04-01"), date("2031-04-05"), "America/Vancouver");
    vancouver.ready_start = Some(time("09:00"));
    vancouver.leave_day_end = Some(time("12:00"));
    settings.city_schedules.push(vancouver);
    stops.push(TourStop::new("Vancouver", date("2031-04-01"), date("2031-04-05")));
    TestApp::with_data(settings, stops, requests)
}

#[tokio::test]
async fn test_schedule_zone_drives_the_day() {
    let app = with_vancouver_leg();
    let (status, body) = app.get("/api/v1/slots?date=2031-04-02&city=Vancouver&duration=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "America/Vancouver");
    assert_eq!(body["city"], "Vancouver");
    // no schedule buffer, so the global 30 minutes applies
    assert_eq!(body["buffer_minutes"], 30);
    let starts: Vec<&str> = body["slots"].as_array().unwrap().iter().map(|s| s["start"].as_str().unwrap()).collect();
    assert_eq!(starts, vec!["09:00", "09:30", "10:00", "10:30", "11:00"]);
}

#[tokio::test]
async fn test_unscheduled_day_uses_default_zone() {
    let app = with_vancouver_leg();
    let (status, body) = app.get("/api/v1/slots?date=2031-03-20&duration=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "America/Toronto");
    assert_eq!(body["city"], "Toronto");
    assert_eq!(body["slots"].as_array().unwrap().len(), 47);
}

#[tokio::test]
async fn test_check_reports_schedule_zone() {
    let app = with_vancouver_leg();
    let (status, body) = app.post_json(
        "/api/v1/slots/check",
        json!({"date": "2031-04-03", "time": "09:30", "city": "Vancouver", "duration": "2"}),
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "America/Vancouver");
    assert_eq!(body["end"], "11:30");

    let (status, body) = app.post_json(
        "/api/v1/slots/check",
        json!({"date": "2031-04-03", "time": "10:30", "city": "Vancouver", "duration": "2"}),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The selected time is outside working hours");
}

#[tokio::test]
async fn test_hidden_and_tentative_bookings_do_not_block() {
    let (mut settings, stops, mut requests) = toronto_fixture();
    settings.hidden_booking_ids = vec!["req-paid".to_string()];
    requests.push(BookingRequest {
        id: "req-maybe".to_string(),
        preferred_date: "2031-03-11".to_string(),
        preferred_time: "15:00".to_string(),
        duration_hours: Some(1.0),
        status: "maybe".to_string(),
        city: "Toronto".to_string(),
        name: "Sam".to_string(),
        ..Default::default()
    });
    let app = TestApp::with_data(settings, stops, requests);

    let (_, body) = app.get("/api/v1/slots?date=2031-03-11&city=Toronto&duration=1").await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 15);

    let (_, grid) = app.get("/api/v1/admin/calendar?start=2031-03-11&days=1").await;
    let cells = grid["days"][0]["cells"].as_array().unwrap();
    assert!(cells[24].get("kind").is_none());
    assert_eq!(cells[30]["kind"], "booking");
    assert_eq!(cells[30]["tentative"], true);
    assert_eq!(cells[30]["label"], "Sam");
}
