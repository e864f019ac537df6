use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{AuthUser, StaffUser};
use crate::api::dtos::requests::RegisterRequest;
use crate::domain::models::auth::Caller;
use crate::domain::models::registration::{self, Registration};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn register(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.contact_number.trim().is_empty() {
        return Err(AppError::Validation("Contact number is required".into()));
    }

    let registration = Registration::new(
        event_id.clone(),
        caller.id.clone(),
        payload.contact_number,
        payload.notes,
    );

    // The repository enforces event state, the duplicate rule and the
    // capacity bound atomically per event.
    let created = state.registration_repo.insert_pending(&registration).await?;

    info!("Registration created: {} for event {}", created.id, event_id);
    Ok(Json(created))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.registration_repo.find_by_id(&registration_id).await?
        .ok_or(AppError::NotFound("Registration not found".into()))?;

    if registration.user_id != caller.id {
        return Err(AppError::Forbidden("You can only cancel your own registration".into()));
    }

    let cancelled = state.registration_repo.cancel_own(&registration_id).await?
        .ok_or(AppError::InvalidState("Only pending registrations can be cancelled".into()))?;

    info!("Registration cancelled by resident: {}", cancelled.id);
    Ok(Json(cancelled))
}

pub async fn approve_registration(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = decide(&state, &registration_id, &staff, registration::status::APPROVED).await?;
    info!("Registration approved: {} by {}", updated.id, staff.id);
    Ok(Json(updated))
}

pub async fn reject_registration(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = decide(&state, &registration_id, &staff, registration::status::REJECTED).await?;
    info!("Registration rejected: {} by {}", updated.id, staff.id);
    Ok(Json(updated))
}

/// Applies a staff decision as a conditional update, then hands the notice
/// to the dispatcher without waiting for delivery.
async fn decide(
    state: &Arc<AppState>,
    registration_id: &str,
    staff: &Caller,
    new_status: &str,
) -> Result<Registration, AppError> {
    let updated = state.registration_repo.review(registration_id, new_status, &staff.id).await?;

    let Some(updated) = updated else {
        return match state.registration_repo.find_by_id(registration_id).await? {
            None => Err(AppError::NotFound("Registration not found".into())),
            Some(_) => Err(AppError::InvalidState("Registration has already been decided".into())),
        };
    };

    let event_title = state.event_repo.find_by_id(&updated.event_id).await?
        .map(|e| e.title)
        .unwrap_or_else(|| "an upcoming event".to_string());

    let notifier = state.notifier.clone();
    let user_id = updated.user_id.clone();
    let status = updated.status.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.notify_registration_status(&user_id, &event_title, &status).await {
            warn!("Failed to dispatch registration notice: {:?}", e);
        }
    });

    Ok(updated)
}

pub async fn list_event_registrations(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let registrations = state.registration_repo.list_by_event(&event_id).await?;
    Ok(Json(registrations))
}

pub async fn list_own_registrations(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let registrations = state.registration_repo.list_by_user(&caller.id).await?;
    Ok(Json(registrations))
}
