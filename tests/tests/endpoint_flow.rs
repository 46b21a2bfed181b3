use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use endpoint_integration_tests::test_app;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_root_health_banner() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_doctor_listing_and_filters() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/catalog/doctors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 6);

    let (status, body) = send(
        &app,
        "GET",
        "/catalog/doctors?speciality=orthopedic",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, "GET", "/catalog/doctors/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["doctor"]["name"], "Dr. Anjali Kumar");

    let (status, _) = send(&app, "GET", "/catalog/doctors/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_booking_checkout_payment_journey() {
    let app = test_app();

    // Expand doctor 1's booking card
    let (status, body) = send(&app, "POST", "/booking/1/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["stage"], "no_plan");

    // Pick a plan
    let (status, body) = send(
        &app,
        "POST",
        "/booking/1/plan",
        Some(json!({ "plan_id": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["stage"], "plan_chosen");

    // Sold-out Saturday is rejected and changes nothing
    let (status, _) = send(
        &app,
        "POST",
        "/booking/1/date",
        Some(json!({ "date": "Sat,25 Oct '25" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "GET", "/booking/1", None).await;
    assert_eq!(body["context"]["stage"], "plan_chosen");

    // Friday has capacity
    let (status, _) = send(
        &app,
        "POST",
        "/booking/1/date",
        Some(json!({ "date": "Fri,24 Oct '25" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/booking/1/time",
        Some(json!({ "time": "11:30 AM" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["can_proceed"], true);

    // Confirm and hand the intent to checkout
    let (status, body) = send(&app, "POST", "/booking/1/confirm", None).await;
    assert_eq!(status, StatusCode::OK);
    let intent = body["booking_intent"].clone();
    assert_eq!(intent["plan"]["price"], 800);

    let (status, body) = send(&app, "POST", "/checkout/order", Some(intent)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["pricing"]["grand_total"], 830);
    assert_eq!(body["display_grand_total"], "₹830");

    // Paying requires a session
    let (status, _) = send(&app, "POST", "/checkout/pay", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Mock login: wrong code rejected, the fixed code succeeds
    let (status, _) = send(
        &app,
        "POST",
        "/session/login",
        Some(json!({ "contact": "priya@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/session/verify",
        Some(json!({ "code": "999999" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/session/verify",
        Some(json!({ "code": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Apply the loyalty coupon and pay
    let (status, body) = send(
        &app,
        "POST",
        "/checkout/coupon",
        Some(json!({ "coupon_id": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["pricing"]["discount"], 80);

    let (status, body) = send(&app, "POST", "/checkout/pay", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["receipt"]["total"], 750);
    assert_eq!(body["display_total"], "₹750");
    assert_eq!(body["receipt"]["paid_through"], "Gpay");

    // The appointment shows up on the listing
    let (status, body) = send(&app, "GET", "/appointments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["appointments"][0]["date"], "Fri,24 Oct '25");
    assert_eq!(body["appointments"][0]["status"], "upcoming");
}

#[tokio::test]
async fn test_collapse_discards_selection_between_journeys() {
    let app = test_app();

    send(&app, "POST", "/booking/2/toggle", None).await;
    send(
        &app,
        "POST",
        "/booking/2/plan",
        Some(json!({ "plan_id": "2" })),
    )
    .await;

    // Collapse and reopen: fresh selection
    send(&app, "POST", "/booking/2/collapse", None).await;
    let (_, body) = send(&app, "POST", "/booking/2/toggle", None).await;
    assert_eq!(body["context"]["stage"], "no_plan");
    assert_eq!(body["context"]["selection"]["plan_id"], Value::Null);
}

#[tokio::test]
async fn test_session_logout_guards_appointments_again() {
    let app = test_app();

    let (status, _) = send(&app, "GET", "/appointments", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    send(
        &app,
        "POST",
        "/session/login",
        Some(json!({ "contact": "priya@example.com" })),
    )
    .await;
    send(
        &app,
        "POST",
        "/session/verify",
        Some(json!({ "code": "123456" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/appointments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = send(&app, "GET", "/session/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logged_in"], true);
    assert_eq!(body["initial"], "P");

    send(&app, "POST", "/session/logout", None).await;
    let (status, _) = send(&app, "GET", "/appointments", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_filter_panel_endpoints_enforce_single_popover() {
    let app = test_app();

    let (_, body) = send(&app, "GET", "/catalog/filters", None).await;
    assert_eq!(body["filters"]["speciality"], "Physiotherapist");
    assert_eq!(body["filters"]["open"], Value::Null);

    let (_, body) = send(
        &app,
        "POST",
        "/catalog/filters/toggle",
        Some(json!({ "filter": "speciality" })),
    )
    .await;
    assert_eq!(body["filters"]["open"], "speciality");

    let (_, body) = send(
        &app,
        "POST",
        "/catalog/filters/toggle",
        Some(json!({ "filter": "location" })),
    )
    .await;
    assert_eq!(body["filters"]["open"], "location");

    let (_, body) = send(
        &app,
        "POST",
        "/catalog/filters/select",
        Some(json!({ "location": "Pune" })),
    )
    .await;
    assert_eq!(body["filters"]["location"], "Pune");
    assert_eq!(body["filters"]["open"], Value::Null);
}
