use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{AuthUser, StaffUser};
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::domain::models::event::{self, Event, NewEventParams};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if payload.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".into()));
    }
    if payload.location.trim().is_empty() {
        return Err(AppError::Validation("Location is required".into()));
    }
    if payload.date < Utc::now().date_naive() {
        return Err(AppError::Validation("Event date cannot be in the past".into()));
    }
    if let Some(end) = payload.end_time {
        if end <= payload.start_time {
            return Err(AppError::Validation("End time must be after start time".into()));
        }
    }
    if let Some(cap) = payload.max_participants {
        if cap <= 0 {
            return Err(AppError::Validation("Capacity must be a positive number".into()));
        }
    }

    let event = Event::new(NewEventParams {
        title: payload.title,
        description: payload.description,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        category: payload.category.unwrap_or_default(),
        max_participants: payload.max_participants,
        created_by: staff.id,
    });

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} ({})", created.id, created.title);
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = if caller.is_staff() {
        state.event_repo.list().await?
    } else {
        state.event_repo.list_visible().await?
    };
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    // Drafts stay invisible to residents until published.
    if !caller.is_staff() && event.status == event::status::DRAFT {
        return Err(AppError::NotFound("Event not found".into()));
    }

    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.is_terminal() {
        return Err(AppError::InvalidState("Completed or cancelled events can no longer be edited".into()));
    }

    let schedule_changed = payload.date.is_some_and(|d| d != event.date)
        || payload.start_time.is_some_and(|t| t != event.start_time)
        || payload.end_time.is_some_and(|t| Some(t) != event.end_time);

    let active = state.registration_repo.count_active(&event.id).await?;

    if schedule_changed && active > 0 {
        return Err(AppError::InvalidState("Event schedule is locked while registrations are active".into()));
    }

    if let Some(val) = payload.title {
        if val.trim().is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        event.title = val;
    }
    if let Some(val) = payload.description { event.description = val; }
    if let Some(val) = payload.date {
        if val < Utc::now().date_naive() {
            return Err(AppError::Validation("Event date cannot be in the past".into()));
        }
        event.date = val;
    }
    if let Some(val) = payload.start_time { event.start_time = val; }
    if let Some(val) = payload.end_time { event.end_time = Some(val); }
    if let Some(end) = event.end_time {
        if end <= event.start_time {
            return Err(AppError::Validation("End time must be after start time".into()));
        }
    }
    if let Some(val) = payload.location { event.location = val; }
    if let Some(val) = payload.category { event.category = val; }
    if let Some(cap) = payload.max_participants {
        if cap <= 0 {
            return Err(AppError::Validation("Capacity must be a positive number".into()));
        }
        if (cap as i64) < active {
            return Err(AppError::Validation("Capacity cannot be below the current number of active registrations".into()));
        }
        event.max_participants = Some(cap);
    }

    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn publish_event(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(event) = state.event_repo.publish(&event_id).await? {
        info!("Event published: {} ({})", event.id, event.title);
        return Ok(Json(event));
    }

    match state.event_repo.find_by_id(&event_id).await? {
        None => Err(AppError::NotFound("Event not found".into())),
        Some(_) => Err(AppError::InvalidState("Only draft events can be published".into())),
    }
}

pub async fn complete_event(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(event) = state.event_repo.complete(&event_id).await? {
        info!("Event completed: {}", event.id);
        return Ok(Json(event));
    }

    match state.event_repo.find_by_id(&event_id).await? {
        None => Err(AppError::NotFound("Event not found".into())),
        Some(_) => Err(AppError::InvalidState("Only published events can be completed".into())),
    }
}

pub async fn cancel_event(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(event) = state.event_repo.cancel(&event_id).await? {
        info!("Event cancelled: {} ({})", event.id, event.title);
        return Ok(Json(event));
    }

    match state.event_repo.find_by_id(&event_id).await? {
        None => Err(AppError::NotFound("Event not found".into())),
        Some(_) => Err(AppError::InvalidState("Event is already completed or cancelled".into())),
    }
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.status != event::status::DRAFT {
        return Err(AppError::InvalidState("Only draft events can be deleted".into()));
    }

    if !state.event_repo.delete_draft(&event_id).await? {
        return Err(AppError::InvalidState("Only draft events can be deleted".into()));
    }

    info!("Event deleted: {}", event_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
