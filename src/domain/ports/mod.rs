use crate::domain::models::{
    attendance::AttendanceRecord, event::Event, registration::Registration,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    /// Events visible to residents: everything past DRAFT except CANCELLED.
    async fn list_visible(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// DRAFT -> PUBLISHED. Returns None when the event is not in DRAFT.
    async fn publish(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// PUBLISHED -> COMPLETED. Returns None when the event is not PUBLISHED.
    async fn complete(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// DRAFT/PUBLISHED -> CANCELLED, flipping all active registrations to
    /// CANCELLED in the same transaction. Returns None when the event is
    /// already terminal.
    async fn cancel(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Deletes the event only while it is still a DRAFT.
    async fn delete_draft(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Inserts a PENDING registration, enforcing event state, the
    /// one-active-registration-per-resident rule and the capacity bound as a
    /// single atomic unit per event.
    async fn insert_pending(&self, registration: &Registration) -> Result<Registration, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError>;
    async fn find_approved(&self, event_id: &str, user_id: &str) -> Result<Option<Registration>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Registration>, AppError>;
    async fn count_active(&self, event_id: &str) -> Result<i64, AppError>;
    /// PENDING -> APPROVED/REJECTED with reviewer audit fields. Returns None
    /// when the registration is no longer PENDING.
    async fn review(&self, id: &str, new_status: &str, reviewed_by: &str) -> Result<Option<Registration>, AppError>;
    /// PENDING -> CANCELLED (self-withdrawal). Returns None when the
    /// registration is no longer PENDING. Ownership is checked by the caller.
    async fn cancel_own(&self, id: &str) -> Result<Option<Registration>, AppError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError>;
    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<Option<AttendanceRecord>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<AttendanceRecord>, AppError>;
    async fn set_check_out(&self, id: &str, time: DateTime<Utc>) -> Result<Option<AttendanceRecord>, AppError>;
    /// Staff correction of a mis-marked record; stamps updated_at.
    async fn correct(&self, id: &str, status: &str, notes: Option<&str>) -> Result<Option<AttendanceRecord>, AppError>;
}

/// Fire-and-forget hand-off to the portal's broadcast service. Delivery
/// mechanics (in-app, SMS) are entirely its concern.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify_registration_status(&self, user_id: &str, event_title: &str, status: &str) -> Result<(), AppError>;
}
