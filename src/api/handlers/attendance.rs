use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::{CheckOutRequest, MarkAttendanceRequest, UpdateAttendanceRequest};
use crate::domain::models::attendance::{self, AttendanceRecord, NewAttendanceParams};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(event_id): Path<String>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !attendance::is_valid_status(&payload.status) {
        return Err(AppError::Validation("Attendance status must be PRESENT, ABSENT or LATE".into()));
    }

    state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    // Attendance only exists for residents who were approved to attend.
    state.registration_repo.find_approved(&event_id, &payload.user_id).await?
        .ok_or(AppError::PreconditionFailed("No approved registration for this participant".into()))?;

    if state.attendance_repo.find_by_event_and_user(&event_id, &payload.user_id).await?.is_some() {
        return Err(AppError::Conflict("Attendance already recorded for this participant".into()));
    }

    let record = AttendanceRecord::new(NewAttendanceParams {
        event_id: event_id.clone(),
        user_id: payload.user_id,
        check_in_time: payload.check_in_time.unwrap_or_else(Utc::now),
        status: payload.status,
        notes: payload.notes,
        recorded_by: staff.id,
    });

    let created = state.attendance_repo.create(&record).await?;
    info!("Attendance recorded: {} for event {}", created.id, event_id);
    Ok(Json(created))
}

pub async fn check_out(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(attendance_id): Path<String>,
    Json(payload): Json<CheckOutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.attendance_repo
        .set_check_out(&attendance_id, payload.time.unwrap_or_else(Utc::now))
        .await?
        .ok_or(AppError::NotFound("Attendance record not found".into()))?;

    info!("Attendance checked out: {}", updated.id);
    Ok(Json(updated))
}

pub async fn update_attendance(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(attendance_id): Path<String>,
    Json(payload): Json<UpdateAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.status.is_none() && payload.notes.is_none() {
        return Err(AppError::Validation("Nothing to update".into()));
    }
    if let Some(status) = &payload.status {
        if !attendance::is_valid_status(status) {
            return Err(AppError::Validation("Attendance status must be PRESENT, ABSENT or LATE".into()));
        }
    }

    let current = state.attendance_repo.find_by_id(&attendance_id).await?
        .ok_or(AppError::NotFound("Attendance record not found".into()))?;

    let status = payload.status.unwrap_or(current.status);

    let updated = state.attendance_repo
        .correct(&attendance_id, &status, payload.notes.as_deref())
        .await?
        .ok_or(AppError::NotFound("Attendance record not found".into()))?;

    info!("Attendance corrected: {} by {}", updated.id, staff.id);
    Ok(Json(updated))
}

pub async fn list_event_attendance(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let records = state.attendance_repo.list_by_event(&event_id).await?;
    Ok(Json(records))
}
