mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{mint_token, TestApp};
use serde_json::json;
use tokio::task::JoinSet;
use tower::ServiceExt;

/// Two residents race for the last slot of a single-slot event. Exactly one
/// wins; the loser gets a conflict, never a second insert.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_registrations_one_slot() {
    let app = TestApp::new().await;
    let event_id = app.seed_published_event(Some(1)).await;

    let mut set = JoinSet::new();
    for i in 0..2 {
        let router = app.router.clone();
        let uri = format!("/api/v1/events/{}/register", event_id);
        let token = mint_token(&format!("racer-{}", i), "Racer", &[]);
        set.spawn(async move {
            let res = router.oneshot(
                Request::builder().method("POST").uri(uri)
                    .header(header::COOKIE, format!("access_token={}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"contact_number": "09170000000"}).to_string()))
                    .unwrap()
            ).await.unwrap();
            res.status()
        });
    }

    let mut successes = 0;
    let mut conflicts = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            StatusCode::OK => successes += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("Unexpected status under contention: {}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_holds_under_many_concurrent_registrations() {
    let app = TestApp::new().await;
    let capacity = 5;
    let attempts = 20;
    let event_id = app.seed_published_event(Some(capacity)).await;

    let mut set = JoinSet::new();
    for i in 0..attempts {
        let router = app.router.clone();
        let uri = format!("/api/v1/events/{}/register", event_id);
        let token = mint_token(&format!("resident-{}", i), "Resident", &[]);
        set.spawn(async move {
            let res = router.oneshot(
                Request::builder().method("POST").uri(uri)
                    .header(header::COOKIE, format!("access_token={}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"contact_number": "09170000000"}).to_string()))
                    .unwrap()
            ).await.unwrap();
            res.status()
        });
    }

    let mut successes = 0;
    while let Some(res) = set.join_next().await {
        if res.unwrap() == StatusCode::OK {
            successes += 1;
        }
    }
    assert_eq!(successes, capacity);

    let active = app.state.registration_repo.count_active(&event_id).await.unwrap();
    assert_eq!(active, capacity as i64);
}

/// The same resident racing themselves must end up with a single active
/// registration, whatever the interleaving.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_registrations_single_active() {
    let app = TestApp::new().await;
    let event_id = app.seed_published_event(None).await;

    let mut set = JoinSet::new();
    for _ in 0..5 {
        let router = app.router.clone();
        let uri = format!("/api/v1/events/{}/register", event_id);
        let token = mint_token("resident-1", "Resident", &[]);
        set.spawn(async move {
            let res = router.oneshot(
                Request::builder().method("POST").uri(uri)
                    .header(header::COOKIE, format!("access_token={}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"contact_number": "09170000000"}).to_string()))
                    .unwrap()
            ).await.unwrap();
            res.status()
        });
    }

    let mut successes = 0;
    while let Some(res) = set.join_next().await {
        if res.unwrap() == StatusCode::OK {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let active = app.state.registration_repo.count_active(&event_id).await.unwrap();
    assert_eq!(active, 1);
}
