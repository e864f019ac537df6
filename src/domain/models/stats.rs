use serde::Serialize;

/// Derived per-event rollup. Never persisted; recomputed on demand from the
/// registration and attendance stores.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EventStats {
    pub event_id: String,
    pub title: String,
    pub total_registrations: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    /// Percentage of approved registrants marked PRESENT. 0.0 when no one
    /// was approved.
    pub attendance_rate: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct CrossEventStats {
    pub total_registrations: i64,
    pub total_attendees: i64,
    pub average_attendance_rate: f64,
    pub top_events: Vec<EventStats>,
}
