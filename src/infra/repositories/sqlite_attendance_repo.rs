use crate::domain::{models::attendance::AttendanceRecord, ports::AttendanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAttendanceRepo {
    pool: SqlitePool,
}

impl SqliteAttendanceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for SqliteAttendanceRepo {
    async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_records (id, event_id, user_id, check_in_time, check_out_time, status, notes, recorded_by, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&record.id).bind(&record.event_id).bind(&record.user_id)
            .bind(record.check_in_time).bind(record.check_out_time).bind(&record.status)
            .bind(&record.notes).bind(&record.recorded_by).bind(record.created_at).bind(record.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM attendance_records WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE event_id = ? AND user_id = ?"
        )
            .bind(event_id).bind(user_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE event_id = ? ORDER BY check_in_time ASC"
        )
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_check_out(&self, id: &str, time: DateTime<Utc>) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records SET check_out_time = ? WHERE id = ? RETURNING *"
        )
            .bind(time).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn correct(&self, id: &str, status: &str, notes: Option<&str>) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records SET status = ?, notes = COALESCE(?, notes), updated_at = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(status).bind(notes).bind(Utc::now()).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
