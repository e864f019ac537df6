mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_mark_attendance_for_approved_registrant() {
    let app = TestApp::new().await;
    let staff = app.staff_token();
    let event_id = app.seed_published_event(Some(10)).await;
    app.seed_approved_registration(&event_id, "resident-1").await;

    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let record = parse_body(res).await;
    assert_eq!(record["status"], "PRESENT");
    assert_eq!(record["user_id"], "resident-1");
    assert_eq!(record["recorded_by"], "staff-1");
    assert!(!record["check_in_time"].is_null());
    assert!(record["check_out_time"].is_null());
}

#[tokio::test]
async fn test_mark_attendance_requires_approved_registration() {
    let app = TestApp::new().await;
    let staff = app.staff_token();
    let event_id = app.seed_published_event(Some(10)).await;

    // No registration at all
    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::PRECONDITION_FAILED);

    // Pending is not enough
    app.seed_registration(&event_id, "resident-2").await;
    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-2",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::PRECONDITION_FAILED);

    // A rejected registration is not enough either
    let registration_id = app.seed_registration(&event_id, "resident-3").await;
    app.send("POST", &format!("/api/v1/registrations/{}/reject", registration_id), Some(&staff), None).await;
    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-3",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn test_mark_attendance_rejects_duplicates_and_bad_input() {
    let app = TestApp::new().await;
    let staff = app.staff_token();
    let event_id = app.seed_published_event(Some(10)).await;
    app.seed_approved_registration(&event_id, "resident-1").await;

    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "LATE"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Re-marking requires the explicit correction path
    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "HERE"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", "/api/v1/events/no-such-event/attendance", Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_attendance_is_staff_only() {
    let app = TestApp::new().await;
    let event_id = app.seed_published_event(Some(10)).await;
    app.seed_approved_registration(&event_id, "resident-1").await;

    let resident = app.resident_token("resident-1");
    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&resident), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_check_out() {
    let app = TestApp::new().await;
    let staff = app.staff_token();
    let event_id = app.seed_published_event(Some(10)).await;
    app.seed_approved_registration(&event_id, "resident-1").await;

    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;
    let attendance_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.send("POST", &format!("/api/v1/attendance/{}/checkout", attendance_id), Some(&staff), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!parse_body(res).await["check_out_time"].is_null());

    let res = app.send("POST", "/api/v1/attendance/no-such-id/checkout", Some(&staff), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attendance_correction() {
    let app = TestApp::new().await;
    let staff = app.staff_token();
    let event_id = app.seed_published_event(Some(10)).await;
    app.seed_approved_registration(&event_id, "resident-1").await;

    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "ABSENT"
    }))).await;
    let record = parse_body(res).await;
    let attendance_id = record["id"].as_str().unwrap().to_string();
    assert!(record["updated_at"].is_null());

    let res = app.send("PUT", &format!("/api/v1/attendance/{}", attendance_id), Some(&staff), Some(json!({
        "status": "PRESENT",
        "notes": "Arrived after the roll call"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let corrected = parse_body(res).await;
    assert_eq!(corrected["status"], "PRESENT");
    assert_eq!(corrected["notes"], "Arrived after the roll call");
    assert!(!corrected["updated_at"].is_null());

    let res = app.send("PUT", &format!("/api/v1/attendance/{}", attendance_id), Some(&staff), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("PUT", &format!("/api/v1/attendance/{}", attendance_id), Some(&staff), Some(json!({
        "status": "SKIPPED"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("PUT", "/api/v1/attendance/no-such-id", Some(&staff), Some(json!({
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_cancellation_voids_attendance_precondition() {
    let app = TestApp::new().await;
    let staff = app.staff_token();
    let event_id = app.seed_published_event(Some(10)).await;
    app.seed_approved_registration(&event_id, "resident-1").await;

    app.send("POST", &format!("/api/v1/events/{}/cancel", event_id), Some(&staff), None).await;

    // The cascade flipped the approval, so there is nobody to mark
    let res = app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;
    assert_eq!(res.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn test_attendance_listing_is_staff_only() {
    let app = TestApp::new().await;
    let staff = app.staff_token();
    let event_id = app.seed_published_event(Some(10)).await;
    app.seed_approved_registration(&event_id, "resident-1").await;

    app.send("POST", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), Some(json!({
        "user_id": "resident-1",
        "status": "PRESENT"
    }))).await;

    let resident = app.resident_token("resident-1");
    let res = app.send("GET", &format!("/api/v1/events/{}/attendance", event_id), Some(&resident), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("GET", &format!("/api/v1/events/{}/attendance", event_id), Some(&staff), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);
}
