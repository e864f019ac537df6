use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub mod status {
    pub const PRESENT: &str = "PRESENT";
    pub const ABSENT: &str = "ABSENT";
    pub const LATE: &str = "LATE";
}

pub fn is_valid_status(value: &str) -> bool {
    matches!(value, status::PRESENT | status::ABSENT | status::LATE)
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AttendanceRecord {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: String,
    pub notes: Option<String>,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub struct NewAttendanceParams {
    pub event_id: String,
    pub user_id: String,
    pub check_in_time: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub recorded_by: String,
}

impl AttendanceRecord {
    pub fn new(params: NewAttendanceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            user_id: params.user_id,
            check_in_time: params.check_in_time,
            check_out_time: None,
            status: params.status,
            notes: params.notes,
            recorded_by: params.recorded_by,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}
