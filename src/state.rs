use std::sync::Arc;
use crate::domain::ports::{
    AttendanceRepository, EventRepository, NotificationDispatcher, RegistrationRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub notifier: Arc<dyn NotificationDispatcher>,
}
