use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{AuthUser, StaffUser};
use crate::api::dtos::requests::SummaryParams;
use crate::domain::models::event::{self, Event};
use crate::domain::models::stats::EventStats;
use crate::domain::services::stats;
use crate::error::AppError;
use std::sync::Arc;

pub async fn event_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !caller.is_staff() && event.status == event::status::DRAFT {
        return Err(AppError::NotFound("Event not found".into()));
    }

    Ok(Json(rollup(&state, &event).await?))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Query(params): Query<SummaryParams>,
) -> Result<impl IntoResponse, AppError> {
    let events = match params.event_ids {
        Some(raw) => {
            let mut events = Vec::new();
            for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                // Dangling ids are skipped; the report covers what exists.
                if let Some(event) = state.event_repo.find_by_id(id).await? {
                    events.push(event);
                }
            }
            events
        }
        None => state.event_repo.list().await?,
    };

    let mut per_event = Vec::with_capacity(events.len());
    for event in &events {
        per_event.push(rollup(&state, event).await?);
    }

    Ok(Json(stats::cross_event_stats(per_event)))
}

async fn rollup(state: &Arc<AppState>, event: &Event) -> Result<EventStats, AppError> {
    let registrations = state.registration_repo.list_by_event(&event.id).await?;
    let attendance = state.attendance_repo.list_by_event(&event.id).await?;
    Ok(stats::event_stats(event, &registrations, &attendance))
}
