use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub mod status {
    pub const PENDING: &str = "PENDING";
    pub const APPROVED: &str = "APPROVED";
    pub const REJECTED: &str = "REJECTED";
    pub const CANCELLED: &str = "CANCELLED";
}

/// A resident's request to attend an event. PENDING and APPROVED rows count
/// against the event's capacity; REJECTED and CANCELLED do not.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub contact_number: String,
    pub notes: Option<String>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Registration {
    pub fn new(event_id: String, user_id: String, contact_number: String, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            user_id,
            contact_number,
            notes,
            status: status::PENDING.to_string(),
            registered_at: Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
        }
    }
}
