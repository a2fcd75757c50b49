mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::*;
use pitchbase_core::Role;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_is_public() {
    let env = env();
    let app = test_app(&env);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_or_garbage_token_is_unauthorized() {
    let env = env();
    let app = test_app(&env);

    let (status, _) = send(&app, Method::GET, "/v1/turfs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/v1/turfs", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_flow_over_http() {
    let env = env();
    let app = test_app(&env);
    let owner_token = token("owner-1", Role::Owner);
    let admin_token = token("admin-1", Role::Admin);
    let player_token = token("player-1", Role::Player);

    let (status, turf) = send(
        &app,
        Method::POST,
        "/v1/turfs",
        Some(&owner_token),
        Some(json!({
            "name": "Champions Arena",
            "location": "Riverside",
            "format": "FIVE_A_SIDE",
            "hourly_price": 2500
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(turf["status"], "PENDING_VERIFICATION");
    let turf_id = turf["id"].as_str().unwrap().to_string();

    let (status, turf) = send(
        &app,
        Method::PUT,
        &format!("/v1/turfs/{}/status", turf_id),
        Some(&admin_token),
        Some(json!({ "status": "ACTIVE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(turf["verified"], true);

    let (status, slot) = send(
        &app,
        Method::POST,
        &format!("/v1/turfs/{}/slots", turf_id),
        Some(&owner_token),
        Some(json!({
            "date": "2026-09-12",
            "range": { "start": "18:00", "end": "19:00" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let slot_id = slot["id"].as_str().unwrap().to_string();

    let booking_body = json!({
        "turf_id": turf_id,
        "date": "2026-09-12",
        "request": { "slot": slot_id },
        "duration_hours": 1,
        "player_name": "Asha Rao",
        "player_email": "asha@example.com",
        "player_phone": "+91-9000000001"
    });
    let (status, booking) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&player_token),
        Some(booking_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["total_amount"], 2500);
    assert_eq!(booking["payment_progress"], "UNPAID");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Same window again: 409 with the machine-readable kind.
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&token("player-2", Role::Player)),
        Some(booking_body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "SLOT_UNAVAILABLE");

    // A stranger cannot accept.
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/bookings/{}/accept", booking_id),
        Some(&token("player-2", Role::Player)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "FORBIDDEN");

    let (status, booking) = send(
        &app,
        Method::POST,
        &format!("/v1/bookings/{}/accept", booking_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "CONFIRMED");

    let (status, booking) = send(
        &app,
        Method::POST,
        &format!("/v1/bookings/{}/payments", booking_id),
        Some(&player_token),
        Some(json!({ "amount": 2500, "method": "CASH" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["paid_amount"], 2500);
    assert_eq!(booking["payment_progress"], "PAID");

    // Overpayment maps to 422.
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/bookings/{}/payments", booking_id),
        Some(&player_token),
        Some(json!({ "amount": 100, "method": "CASH" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "OVERPAYMENT");
}

#[tokio::test]
async fn processor_webhook_settles_an_open_payment() {
    let env = env();
    let app = test_app(&env);
    let player_token = token("player-1", Role::Player);

    let turf = active_turf(&env, 2000).await;
    let (status, booking) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&player_token),
        Some(json!({
            "turf_id": turf.id,
            "date": "2026-09-12",
            "request": { "range": { "start": "10:00", "end": "11:00" } },
            "duration_hours": 1,
            "player_name": "Asha Rao",
            "player_email": "asha@example.com",
            "player_phone": "+91-9000000001"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, intent) = send(
        &app,
        Method::POST,
        &format!("/v1/bookings/{}/payments/intent", booking_id),
        Some(&player_token),
        Some(json!({ "amount": 2000, "method": "CARD" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(intent["payment"]["state"], "PENDING");
    assert!(intent["processor_ref"].as_str().unwrap().starts_with("pp_"));
    let payment_id = intent["payment"]["id"].as_str().unwrap().to_string();

    // The webhook is unauthenticated; the processor calls it directly.
    let (status, payment) = send(
        &app,
        Method::POST,
        "/v1/webhooks/payments",
        None,
        Some(json!({ "payment_id": payment_id, "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["state"], "COMPLETED");

    let (status, booking) = send(
        &app,
        Method::GET,
        &format!("/v1/bookings/{}", booking_id),
        Some(&player_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["paid_amount"], 2000);
    assert_eq!(booking["payment_progress"], "PAID");

    // Replaying the webhook fails cleanly and changes nothing.
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/webhooks/payments",
        None,
        Some(json!({ "payment_id": payment_id, "status": "FAILED" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "INVALID_STATE");
}

#[tokio::test]
async fn reports_require_matching_owner_or_admin() {
    let env = env();
    let app = test_app(&env);

    // An owner asking about someone else's books is refused.
    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/reports/revenue?from=2026-09-01&to=2026-09-30&owner_id=owner-2",
        Some(&token("owner-1", Role::Owner)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "FORBIDDEN");

    // Admin may.
    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/reports/revenue?from=2026-09-01&to=2026-09-30&owner_id=owner-2",
        Some(&token("admin-1", Role::Admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_revenue"], 0);
}
