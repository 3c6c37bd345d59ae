//! Handler tests for the events domain
//!
//! Drive the router end to end against in-memory repositories:
//! - Request deserialization and validation messages
//! - HTTP status codes
//! - Response envelopes

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_events::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, assertions::assert_eq_ignore_case};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let events = InMemoryEventRepository::new();
    let registrations = InMemoryRegistrationRepository::new();
    handlers::router(
        EventService::new(events.clone()),
        RegistrationService::new(events, registrations),
    )
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

async fn post_event(app: &Router, title: &str, capacity: i64) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/postevent",
        json!({
            "title": title,
            "desc": "An evening of talks",
            "date": "2025-09-02",
            "time": "18:00",
            "capacity": capacity
        }),
    )
    .await
}

async fn register(app: &Router, name: &str, email: &str, title: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/registration",
        json!({ "name": name, "email": email, "eventTitle": title }),
    )
    .await
}

#[tokio::test]
async fn test_created_event_matches_input_and_is_listed() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("created_event_listed");
    let title = builder.name("event", "meetup");

    let (status, body) = post_event(&app, &title, 25).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event added successfully");
    assert_eq!(body["event"]["title"], title.as_str());
    assert_eq!(body["event"]["desc"], "An evening of talks");
    assert_eq!(body["event"]["date"], "2025-09-02");
    assert_eq!(body["event"]["time"], "18:00");
    assert_eq!(body["event"]["capacity"], 25);

    let (status, body) = get(&app, "/getevent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Events retrieved successfully");
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], title.as_str());
}

#[tokio::test]
async fn test_create_event_missing_field_persists_nothing() {
    let app = app();

    for missing in ["title", "desc", "date", "time", "capacity"] {
        let mut body = json!({
            "title": "Meetup",
            "desc": "Talks",
            "date": "2025-09-02",
            "time": "18:00",
            "capacity": 5
        });
        body.as_object_mut().unwrap().remove(missing);

        let (status, response) = send(&app, "POST", "/postevent", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {missing}");
        assert_eq!(
            response["message"],
            "Please provide title, desc, date, time, and capacity"
        );
    }

    let (_, body) = post_event(&app, "Meetup", 0).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (_, body) = get(&app, "/getevent").await;
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_for_unknown_event_is_404() {
    let app = app();

    let (status, body) = register(&app, "ada", "ada@example.com", "Nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");

    let (_, body) = get(&app, "/getregistration").await;
    assert!(body["registrations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_twice_conflicts() {
    let app = app();
    post_event(&app, "Meetup", 10).await;

    let (status, body) = register(&app, "ada", "ada@example.com", "Meetup").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["registration"]["eventDesc"], "An evening of talks");

    let (status, body) = register(&app, "ada", "ada@example.com", "Meetup").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Already registered for this event");

    let (_, body) = get(&app, "/getregistration").await;
    assert_eq!(body["registrations"].as_array().unwrap().len(), 1);
    assert_eq_ignore_case(
        body["registrations"][0]["eventTitle"].as_str().unwrap(),
        "rust meetup",
        "filtered event title",
    );

    let (_, body) = get(&app, "/getevent").await;
    assert_eq!(body["events"][0]["capacity"], 9);
}

#[tokio::test]
async fn test_last_seat_then_full() {
    let app = app();
    post_event(&app, "Workshop", 1).await;

    let (status, _) = register(&app, "ada", "ada@example.com", "Workshop").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/getevent").await;
    assert_eq!(body["events"][0]["capacity"], 0);

    let (status, body) = register(&app, "bob", "bob@example.com", "Workshop").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event is full");
    assert_eq!(body["error"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn test_full_event_does_not_borrow_seat_from_same_titled_event() {
    let app = app();
    post_event(&app, "Meetup", 1).await;
    register(&app, "ada", "ada@example.com", "Meetup").await;
    post_event(&app, "Meetup", 5).await;

    let (status, body) = register(&app, "bob", "bob@example.com", "Meetup").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event is full");

    let (_, body) = get(&app, "/getevent").await;
    assert_eq!(body["events"][0]["capacity"], 0);
    assert_eq!(body["events"][1]["capacity"], 5);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = app();
    let (status, body) = send(&app, "POST", "/registration", json!({ "name": "ada" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide name, email, and event title");
}

#[tokio::test]
async fn test_search_and_filter_ignore_case() {
    let app = app();
    post_event(&app, "Rust Meetup", 5).await;
    register(&app, "ada", "A@B.com", "Rust Meetup").await;

    let (status, body) = send(
        &app,
        "POST",
        "/searchregistration",
        json!({ "email": "a@b.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registrations found successfully");
    assert_eq!(body["registrations"][0]["email"], "A@B.com");

    let (status, body) = send(
        &app,
        "POST",
        "/filterregistration",
        json!({ "eventTitle": "RUST MEETUP" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registrations for event found successfully");
    assert_eq!(body["registrations"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "POST",
        "/searchregistration",
        json!({ "email": "a@b.co" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No registration found with that email");

    let (status, body) = send(&app, "POST", "/filterregistration", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide an event title");
}

#[tokio::test]
async fn test_delete_then_lookup_misses() {
    let app = app();
    post_event(&app, "Meetup", 5).await;
    register(&app, "ada", "ada@example.com", "Meetup").await;

    let (status, body) = send(&app, "DELETE", "/deleteevent", json!({ "title": "Nope" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");

    let (status, body) = send(&app, "DELETE", "/deleteevent", json!({ "title": "Meetup" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (status, _) = send(&app, "DELETE", "/deleteevent", json!({ "title": "Meetup" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "DELETE",
        "/deleteregistration",
        json!({ "name": "ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration deleted successfully");

    let (status, body) = send(
        &app,
        "POST",
        "/getoneregistration",
        json!({ "name": "ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No registration found with that name");

    let (status, body) = send(&app, "DELETE", "/deleteregistration", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide a name to delete registration");

    let (status, body) = send(
        &app,
        "DELETE",
        "/deleteregistration",
        json!({ "name": "ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Registration not found");
}

#[tokio::test]
async fn test_registration_partial_update() {
    let app = app();
    post_event(&app, "Meetup", 5).await;
    register(&app, "ada", "ada@example.com", "Meetup").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/updateregistration",
        json!({ "name": "ada", "email": "ada@lovelace.dev" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration updated successfully");
    assert_eq!(body["registration"]["name"], "ada");
    assert_eq!(body["registration"]["email"], "ada@lovelace.dev");

    let (status, body) = send(
        &app,
        "PUT",
        "/updateregistration",
        json!({ "name": "ada", "newName": "countess" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration"]["name"], "countess");
    assert_eq!(body["registration"]["email"], "ada@lovelace.dev");

    let (status, body) = send(
        &app,
        "PUT",
        "/updateregistration",
        json!({ "name": "ada", "newName": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Registration not found");
}

#[tokio::test]
async fn test_event_update_is_partial() {
    let app = app();
    post_event(&app, "Meetup", 5).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/updateevent",
        json!({ "title": "Meetup", "time": "19:30", "capacity": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event updated successfully");
    assert_eq!(body["event"]["time"], "19:30");
    assert_eq!(body["event"]["capacity"], 0);
    assert_eq!(body["event"]["desc"], "An evening of talks");

    let (status, body) = send(
        &app,
        "PUT",
        "/updateevent",
        json!({ "title": "Nope", "capacity": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");

    let (status, body) = send(
        &app,
        "PUT",
        "/updateevent",
        json!({ "title": "Meetup", "capacity": -1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Capacity cannot be negative");
}

#[tokio::test]
async fn test_get_one_returns_every_match() {
    let app = app();
    post_event(&app, "Meetup", 5).await;
    post_event(&app, "Workshop", 5).await;
    register(&app, "ada", "ada@example.com", "Meetup").await;
    register(&app, "ada", "ada@example.com", "Workshop").await;

    let (status, body) = send(
        &app,
        "POST",
        "/getoneregistration",
        json!({ "name": "ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration found successfully");
    assert_eq!(body["registrations"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "POST", "/getoneregistration", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide a name");
}

#[tokio::test]
async fn test_malformed_json_is_structured_error() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/postevent")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}
