use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use time::macros::{date, time};
use tower::ServiceExt;

use crate::{
    adapters::outbound::memory::InMemoryParkStore,
    domain::{
        calendar::ParkCalendar,
        models::{ActivityId, NewActivity, TimeSlotId},
        ports::outbound::SeedRepository,
        services::{CatalogSeeder, SeedPlan, DEFAULT_MAX_ATTEMPTS},
    },
    factory::{self, ServiceOptions},
    router,
};

struct TestApp {
    app: Router,
    tirolesa: ActivityId,
    safari: ActivityId,
    ten_o_clock: TimeSlotId,
}

/// The default catalog seeded for Wednesday 15th October 2025 only.
async fn test_app() -> TestApp {
    let store = InMemoryParkStore::new();
    let repository = Arc::new(store.clone());
    let calendar = ParkCalendar::default();

    CatalogSeeder::new(repository.clone(), calendar)
        .seed(
            &SeedPlan::park_default(),
            date!(2025 - 10 - 15),
            date!(2025 - 10 - 15),
        )
        .await
        .unwrap();

    let options = ServiceOptions {
        calendar,
        max_attempts: DEFAULT_MAX_ATTEMPTS,
    };
    let app = router::create(factory::memory_state(store, options), &[]);

    // Seeding is idempotent, so these return the ids already installed.
    TestApp {
        app,
        tirolesa: repository
            .ensure_activity(&NewActivity::new("Tirolesa", true))
            .await
            .unwrap(),
        safari: repository
            .ensure_activity(&NewActivity::new("Safari", false))
            .await
            .unwrap(),
        ten_o_clock: repository.ensure_time_slot(time!(10:00)).await.unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_booking(body: Value) -> Request<Body> {
    Request::post("/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

impl TestApp {
    fn booking(&self, activity_id: ActivityId, date: &str, visitors: Value) -> Value {
        json!({
            "activityId": activity_id,
            "timeSlotId": self.ten_o_clock,
            "date": date,
            "acceptsTerms": true,
            "visitors": visitors,
        })
    }
}

#[tokio::test]
async fn lists_activities_with_aggregated_capacity() {
    let test = test_app().await;

    let (status, body) = send(&test.app, get("/activities")).await;

    assert_eq!(status, StatusCode::OK);
    let activities = body["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 4);
    assert_eq!(activities[0]["name"], "Tirolesa");
    assert_eq!(activities[0]["requiresSize"], true);
    assert_eq!(activities[0]["totalCapacity"], 18 * 10);
    assert_eq!(activities[0]["scheduleCount"], 18);
    assert_eq!(activities[1]["name"], "Safari");
    assert_eq!(activities[1]["totalCapacity"], 18 * 8);
}

#[tokio::test]
async fn activity_detail_lists_schedule() {
    let test = test_app().await;

    let (status, body) = send(&test.app, get(&format!("/activities/{}", test.tirolesa))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activity"]["name"], "Tirolesa");
    let schedule = body["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 18);
    assert_eq!(schedule[0]["startsAt"], "09:00");
    assert_eq!(schedule[0]["date"], "2025-10-15");
    assert_eq!(schedule[0]["remainingCapacity"], 10);
    assert_eq!(schedule[1]["startsAt"], "09:30");
    assert_eq!(schedule[17]["startsAt"], "17:30");
}

#[tokio::test]
async fn unknown_activity_is_not_found() {
    let test = test_app().await;

    let (status, body) = send(&test.app, get("/activities/9999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ACTIVITY_NOT_FOUND");
}

#[tokio::test]
async fn non_numeric_activity_id_is_bad_request() {
    let test = test_app().await;

    let (status, body) = send(&test.app, get("/activities/tirolesa")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn booking_returns_receipt() {
    let test = test_app().await;
    let request = test.booking(
        test.tirolesa,
        "2025-10-15",
        json!([{ "name": "Ana", "nationalId": "30111222", "age": 28, "size": "M" }]),
    );

    let (status, body) = send(&test.app, post_booking(request)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Booking confirmed");
    assert_eq!(body["bookingIds"].as_array().unwrap().len(), 1);
    assert_eq!(body["remainingCapacity"], 9);

    let (_, detail) = send(&test.app, get(&format!("/activities/{}", test.tirolesa))).await;
    assert_eq!(detail["schedule"][2]["startsAt"], "10:00");
    assert_eq!(detail["schedule"][2]["remainingCapacity"], 9);
}

#[tokio::test]
async fn exhausted_capacity_is_conflict() {
    let test = test_app().await;
    let group: Vec<Value> = (1..=8)
        .map(|i| json!({ "name": format!("Guest {i}"), "nationalId": format!("{i}"), "age": 40 }))
        .collect();

    let (status, body) = send(
        &test.app,
        post_booking(test.booking(test.safari, "2025-10-15", json!(group))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["remainingCapacity"], 0);

    let latecomer = json!([{ "name": "Bruno", "nationalId": "9", "age": 40 }]);
    let (status, body) = send(
        &test.app,
        post_booking(test.booking(test.safari, "2025-10-15", latecomer)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CAPACITY_EXHAUSTED");
}

#[tokio::test]
async fn missing_size_is_bad_request() {
    let test = test_app().await;
    let request = test.booking(
        test.tirolesa,
        "2025-10-15",
        json!([{ "name": "Carla", "nationalId": "3", "age": 12 }]),
    );

    let (status, body) = send(&test.app, post_booking(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SIZE_REQUIRED");
}

#[tokio::test]
async fn closed_day_is_bad_request() {
    let test = test_app().await;
    let request = test.booking(
        test.safari,
        "2025-10-13",
        json!([{ "name": "Dario", "nationalId": "4", "age": 33 }]),
    );

    let (status, body) = send(&test.app, post_booking(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PARK_CLOSED");
}

#[tokio::test]
async fn declined_terms_are_bad_request() {
    let test = test_app().await;
    let mut request = test.booking(
        ActivityId::new(9999),
        "2025-10-15",
        json!([{ "name": "Eva", "nationalId": "5", "age": 51 }]),
    );
    request["acceptsTerms"] = json!(false);

    let (status, body) = send(&test.app, post_booking(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TERMS_NOT_ACCEPTED");
}

#[tokio::test]
async fn unknown_time_slot_is_not_found() {
    let test = test_app().await;
    let mut request = test.booking(
        test.safari,
        "2025-10-15",
        json!([{ "name": "Fede", "nationalId": "6", "age": 19 }]),
    );
    request["timeSlotId"] = json!(9999);

    let (status, body) = send(&test.app, post_booking(request)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TIME_SLOT_NOT_FOUND");
}

#[tokio::test]
async fn malformed_payload_is_bad_request() {
    let test = test_app().await;
    let request = Request::post("/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"activityId": "one"}"#))
        .unwrap();

    let (status, body) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn health_reports_store_reachable() {
    let test = test_app().await;

    let (status, body) = send(&test.app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storeReachable"], true);
}
