use crate::domain::{models::attendance::AttendanceRecord, ports::AttendanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresAttendanceRepo {
    pool: PgPool,
}

impl PostgresAttendanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepo {
    async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_records (id, event_id, user_id, check_in_time, check_out_time, status, notes, recorded_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&record.id).bind(&record.event_id).bind(&record.user_id)
            .bind(record.check_in_time).bind(record.check_out_time).bind(&record.status)
            .bind(&record.notes).bind(&record.recorded_by).bind(record.created_at).bind(record.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM attendance_records WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE event_id = $1 AND user_id = $2"
        )
            .bind(event_id).bind(user_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE event_id = $1 ORDER BY check_in_time ASC"
        )
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_check_out(&self, id: &str, time: DateTime<Utc>) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records SET check_out_time = $1 WHERE id = $2 RETURNING *"
        )
            .bind(time).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn correct(&self, id: &str, status: &str, notes: Option<&str>) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records SET status = $1, notes = COALESCE($2, notes), updated_at = $3
             WHERE id = $4
             RETURNING *"
        )
            .bind(status).bind(notes).bind(Utc::now()).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
