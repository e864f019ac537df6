use crate::domain::models::attendance::{self, AttendanceRecord};
use crate::domain::models::event::Event;
use crate::domain::models::registration::{self, Registration};
use crate::domain::models::stats::{CrossEventStats, EventStats};

/// Rolls up one event from already-fetched rows. Pure and idempotent: the
/// same inputs always produce the same output, and missing rows count as
/// zero.
pub fn event_stats(event: &Event, registrations: &[Registration], attendance: &[AttendanceRecord]) -> EventStats {
    let total_registrations = registrations
        .iter()
        .filter(|r| r.status == registration::status::APPROVED)
        .count() as i64;

    let mut present = 0i64;
    let mut absent = 0i64;
    let mut late = 0i64;
    for record in attendance {
        match record.status.as_str() {
            attendance::status::PRESENT => present += 1,
            attendance::status::ABSENT => absent += 1,
            attendance::status::LATE => late += 1,
            _ => {}
        }
    }

    let attendance_rate = if total_registrations > 0 {
        present as f64 * 100.0 / total_registrations as f64
    } else {
        0.0
    };

    EventStats {
        event_id: event.id.clone(),
        title: event.title.clone(),
        total_registrations,
        present,
        absent,
        late,
        attendance_rate,
    }
}

/// Aggregates per-event rollups into the cross-event report. Top events are
/// ordered by attendance rate, then present count, then event id so the
/// output is deterministic across runs.
pub fn cross_event_stats(mut per_event: Vec<EventStats>) -> CrossEventStats {
    let total_registrations = per_event.iter().map(|s| s.total_registrations).sum();
    let total_attendees = per_event.iter().map(|s| s.present).sum();

    let average_attendance_rate = if per_event.is_empty() {
        0.0
    } else {
        per_event.iter().map(|s| s.attendance_rate).sum::<f64>() / per_event.len() as f64
    };

    per_event.sort_by(|a, b| {
        b.attendance_rate
            .total_cmp(&a.attendance_rate)
            .then_with(|| b.present.cmp(&a.present))
            .then_with(|| a.event_id.cmp(&b.event_id))
    });

    CrossEventStats {
        total_registrations,
        total_attendees,
        average_attendance_rate,
        top_events: per_event,
    }
}
