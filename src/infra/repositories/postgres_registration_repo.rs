use crate::domain::{models::event::Event, models::registration::Registration, ports::RegistrationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepo {
    async fn insert_pending(&self, registration: &Registration) -> Result<Registration, AppError> {
        let today = Utc::now().date_naive();
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the event serializes concurrent registrations near the
        // capacity boundary; everything below sees a settled count.
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(&registration.event_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if event.status != "PUBLISHED" {
            return Err(AppError::InvalidState("Event is not open for registration".into()));
        }
        if event.date < today {
            return Err(AppError::InvalidState("Event date has already passed".into()));
        }

        let duplicates: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND user_id = $2 AND status IN ('PENDING', 'APPROVED')"
        )
            .bind(&registration.event_id).bind(&registration.user_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if duplicates > 0 {
            return Err(AppError::Conflict("Already registered for this event".into()));
        }

        if let Some(cap) = event.max_participants {
            let active: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status IN ('PENDING', 'APPROVED')"
            )
                .bind(&registration.event_id)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            if active >= cap as i64 {
                return Err(AppError::CapacityExceeded("Event is full".into()));
            }
        }

        let created = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, event_id, user_id, contact_number, notes, status, registered_at, reviewed_by, reviewed_at)
             VALUES ($1, $2, $3, $4, $5, 'PENDING', $6, NULL, NULL)
             RETURNING *"
        )
            .bind(&registration.id).bind(&registration.event_id).bind(&registration.user_id)
            .bind(&registration.contact_number).bind(&registration.notes).bind(registration.registered_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_approved(&self, event_id: &str, user_id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 AND user_id = $2 AND status = 'APPROVED'"
        )
            .bind(event_id).bind(user_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 ORDER BY registered_at ASC"
        )
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE user_id = $1 ORDER BY registered_at DESC"
        )
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_active(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status IN ('PENDING', 'APPROVED')"
        )
            .bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn review(&self, id: &str, new_status: &str, reviewed_by: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = $1, reviewed_by = $2, reviewed_at = $3
             WHERE id = $4 AND status = 'PENDING'
             RETURNING *"
        )
            .bind(new_status).bind(reviewed_by).bind(Utc::now()).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel_own(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = 'CANCELLED' WHERE id = $1 AND status = 'PENDING' RETURNING *"
        )
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
