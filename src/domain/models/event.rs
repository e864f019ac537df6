use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

pub mod status {
    pub const DRAFT: &str = "DRAFT";
    pub const PUBLISHED: &str = "PUBLISHED";
    pub const COMPLETED: &str = "COMPLETED";
    pub const CANCELLED: &str = "CANCELLED";
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub category: String,
    pub max_participants: Option<i32>,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub category: String,
    pub max_participants: Option<i32>,
    pub created_by: String,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            location: params.location,
            category: params.category,
            max_participants: params.max_participants,
            status: status::DRAFT.to_string(),
            created_by: params.created_by,
            created_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status == status::COMPLETED || self.status == status::CANCELLED
    }
}
