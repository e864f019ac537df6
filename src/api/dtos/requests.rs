use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub category: Option<String>,
    pub max_participants: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub max_participants: Option<i32>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub contact_number: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct MarkAttendanceRequest {
    pub user_id: String,
    pub status: String,
    pub check_in_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CheckOutRequest {
    pub time: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct UpdateAttendanceRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct SummaryParams {
    pub event_ids: Option<String>,
}
