use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{attendance, event, health, registration, stats};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Event catalog
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/{event_id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/v1/events/{event_id}/publish", post(event::publish_event))
        .route("/api/v1/events/{event_id}/complete", post(event::complete_event))
        .route("/api/v1/events/{event_id}/cancel", post(event::cancel_event))

        // Registration ledger
        .route("/api/v1/events/{event_id}/register", post(registration::register))
        .route("/api/v1/events/{event_id}/registrations", get(registration::list_event_registrations))
        .route("/api/v1/registrations/mine", get(registration::list_own_registrations))
        .route("/api/v1/registrations/{registration_id}/cancel", post(registration::cancel_registration))

        // Approval workflow
        .route("/api/v1/registrations/{registration_id}/approve", post(registration::approve_registration))
        .route("/api/v1/registrations/{registration_id}/reject", post(registration::reject_registration))

        // Attendance tracking
        .route("/api/v1/events/{event_id}/attendance", post(attendance::mark_attendance).get(attendance::list_event_attendance))
        .route("/api/v1/attendance/{attendance_id}", put(attendance::update_attendance))
        .route("/api/v1/attendance/{attendance_id}/checkout", post(attendance::check_out))

        // Reporting
        .route("/api/v1/events/{event_id}/stats", get(stats::event_stats))
        .route("/api/v1/reports/summary", get(stats::summary))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
