//! Booking lifecycle across customers and administrators.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{auth_header, bearer, booking_body, spawn_app, TestApp};

/// An app with one admin, one service and a customer token.
async fn seeded() -> (TestApp, String, i64, String) {
    let app = spawn_app().await;
    let (_, admin) = app.register_admin("admin@example.com").await;
    let service_id = app.create_service(&admin, "Deep Tissue Massage", 110.0, 0).await;
    let (_, customer) = app.register("jane@example.com").await;
    (app, admin, service_id, customer)
}

#[tokio::test]
async fn test_create_booking_prices_from_service() {
    let (app, _, service_id, customer) = seeded().await;

    let mut body = booking_body(service_id);
    body["totalAmount"] = json!(1.0);
    let response = app
        .server
        .post("/api/bookings")
        .add_header(auth_header(), bearer(&customer))
        .json(&body)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "Booking created successfully");
    let booking = &body["data"];
    assert_eq!(booking["totalAmount"], 110.0);
    assert_eq!(booking["status"], "Pending");
    assert_eq!(booking["paymentStatus"], "Pending");
    assert_eq!(booking["appointmentDate"], "2099-06-01");
    assert_eq!(booking["service"]["title"], "Deep Tissue Massage");
    assert_eq!(booking["user"]["email"], "jane@example.com");
}

#[tokio::test]
async fn test_create_booking_rejections() {
    let (app, _, service_id, customer) = seeded().await;

    let unknown = app
        .server
        .post("/api/bookings")
        .add_header(auth_header(), bearer(&customer))
        .json(&booking_body(9999))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(unknown.json::<Value>()["message"], "Service not found");

    let mut past = booking_body(service_id);
    past["appointmentDate"] = json!("2001-01-01");
    let response = app
        .server
        .post("/api/bookings")
        .add_header(auth_header(), bearer(&customer))
        .json(&past)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Appointment date cannot be in the past"
    );

    let anonymous = app.server.post("/api/bookings").json(&booking_body(service_id)).await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_my_bookings_only_lists_own() {
    let (app, _, service_id, jane) = seeded().await;
    let (_, john) = app.register("john@example.com").await;
    app.create_booking(&jane, service_id).await;
    app.create_booking(&jane, service_id).await;
    app.create_booking(&john, service_id).await;

    let response = app
        .server
        .get("/api/bookings/my")
        .add_header(auth_header(), bearer(&jane))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["count"], 2);
    for booking in body["data"].as_array().unwrap() {
        assert_eq!(booking["user"]["email"], "jane@example.com");
    }
}

#[tokio::test]
async fn test_other_customers_booking_is_forbidden() {
    let (app, admin, service_id, jane) = seeded().await;
    let (_, john) = app.register("john@example.com").await;
    let booking = app.create_booking(&jane, service_id).await;
    let id = booking["id"].as_i64().unwrap();

    let view = app
        .server
        .get(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&john))
        .await;
    assert_eq!(view.status_code(), StatusCode::FORBIDDEN);

    let delete = app
        .server
        .delete(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&john))
        .await;
    assert_eq!(delete.status_code(), StatusCode::FORBIDDEN);

    let admin_view = app
        .server
        .get(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&admin))
        .await;
    assert_eq!(admin_view.status_code(), StatusCode::OK);
    assert_eq!(admin_view.json::<Value>()["data"]["id"], id);
}

#[tokio::test]
async fn test_status_changes_are_admin_only() {
    let (app, admin, service_id, jane) = seeded().await;
    let id = app.create_booking(&jane, service_id).await["id"].as_i64().unwrap();

    let customer = app
        .server
        .put(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&jane))
        .json(&json!({"status": "Confirmed"}))
        .await;
    assert_eq!(customer.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(
        customer.json::<Value>()["message"],
        "Only administrators can change booking status or notes"
    );

    let admin = app
        .server
        .put(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&admin))
        .json(&json!({"status": "Confirmed", "paymentStatus": "Paid", "notes": "Prefers lavender"}))
        .await;
    assert_eq!(admin.status_code(), StatusCode::OK);
    let body = admin.json::<Value>();
    assert_eq!(body["message"], "Booking updated successfully");
    assert_eq!(body["data"]["status"], "Confirmed");
    assert_eq!(body["data"]["paymentStatus"], "Paid");
    assert_eq!(body["data"]["notes"], "Prefers lavender");

    let invalid = app
        .server
        .put(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&jane))
        .json(&json!({"status": "Teleported"}))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_reschedules_and_cancels() {
    let (app, _, service_id, jane) = seeded().await;
    let id = app.create_booking(&jane, service_id).await["id"].as_i64().unwrap();

    let update = app
        .server
        .put(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&jane))
        .json(&json!({"appointmentTime": "15:00", "appointmentDate": "2099-07-01"}))
        .await;
    assert_eq!(update.status_code(), StatusCode::OK);
    let data = &update.json::<Value>()["data"];
    assert_eq!(data["appointmentTime"], "15:00");
    assert_eq!(data["appointmentDate"], "2099-07-01");
    assert_eq!(data["customerName"], "Jane Doe");

    let delete = app
        .server
        .delete(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&jane))
        .await;
    assert_eq!(delete.status_code(), StatusCode::OK);
    assert_eq!(delete.json::<Value>()["message"], "Booking deleted successfully");

    let gone = app
        .server
        .get(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&jane))
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(gone.json::<Value>()["message"], "Booking not found");
}

#[tokio::test]
async fn test_admin_list_is_newest_first() {
    let (app, admin, service_id, jane) = seeded().await;
    let (_, john) = app.register("john@example.com").await;
    let first = app.create_booking(&jane, service_id).await["id"].as_i64().unwrap();
    let second = app.create_booking(&john, service_id).await["id"].as_i64().unwrap();

    let response = app
        .server
        .get("/api/bookings")
        .add_header(auth_header(), bearer(&admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["id"], second);
    assert_eq!(body["data"][1]["id"], first);
    assert_eq!(body["data"][0]["user"]["email"], "john@example.com");
    assert_eq!(body["data"][1]["service"]["title"], "Deep Tissue Massage");
}

#[tokio::test]
async fn test_deleting_user_removes_their_bookings() {
    let (app, admin, service_id, _) = seeded().await;
    let (john_id, john) = app.register("john@example.com").await;
    app.create_booking(&john, service_id).await;

    let delete = app
        .server
        .delete(&format!("/api/users/{john_id}"))
        .add_header(auth_header(), bearer(&admin))
        .await;
    assert_eq!(delete.status_code(), StatusCode::OK);

    let list = app
        .server
        .get("/api/bookings")
        .add_header(auth_header(), bearer(&admin))
        .await;
    assert_eq!(list.json::<Value>()["count"], 0);
}

#[tokio::test]
async fn test_explicit_null_clears_optional_fields() {
    let (app, admin, service_id, jane) = seeded().await;
    let id = app.create_booking(&jane, service_id).await["id"].as_i64().unwrap();

    let noted = app
        .server
        .put(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&admin))
        .json(&json!({"notes": "Prefers lavender"}))
        .await;
    assert_eq!(noted.json::<Value>()["data"]["notes"], "Prefers lavender");

    let cleared = app
        .server
        .put(&format!("/api/bookings/{id}"))
        .add_header(auth_header(), bearer(&admin))
        .json(&json!({"notes": null, "specialRequests": null}))
        .await;
    assert_eq!(cleared.status_code(), StatusCode::OK);
    let data = &cleared.json::<Value>()["data"];
    assert_eq!(data["notes"], Value::Null);
    assert_eq!(data["specialRequests"], Value::Null);
    assert_eq!(data["appointmentTime"], "10:30");
}
