use crate::domain::{models::event::Event, models::registration::Registration, ports::RegistrationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteRegistrationRepo {
    pool: SqlitePool,
}

impl SqliteRegistrationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Reconstructs why the guarded insert matched no rows. Runs outside the
    /// insert itself, so under heavy contention the reported reason may be a
    /// neighbouring one; the invariants themselves are enforced by the insert.
    async fn rejection_reason(&self, event_id: &str, user_id: &str, today: NaiveDate) -> AppError {
        let event = match sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(event_id).fetch_optional(&self.pool).await
        {
            Ok(event) => event,
            Err(e) => return AppError::Database(e),
        };

        let Some(event) = event else {
            return AppError::NotFound("Event not found".into());
        };
        if event.status != "PUBLISHED" {
            return AppError::InvalidState("Event is not open for registration".into());
        }
        if event.date < today {
            return AppError::InvalidState("Event date has already passed".into());
        }

        let duplicate = sqlx::query(
            "SELECT COUNT(*) as count FROM registrations WHERE event_id = ? AND user_id = ? AND status IN ('PENDING', 'APPROVED')"
        )
            .bind(event_id).bind(user_id).fetch_one(&self.pool).await;
        match duplicate {
            Ok(row) if row.get::<i64, _>("count") > 0 => {
                AppError::Conflict("Already registered for this event".into())
            }
            Ok(_) => AppError::CapacityExceeded("Event is full".into()),
            Err(e) => AppError::Database(e),
        }
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepo {
    async fn insert_pending(&self, registration: &Registration) -> Result<Registration, AppError> {
        let today = Utc::now().date_naive();

        // Single statement so the event check, the duplicate check, the
        // capacity count and the insert cannot interleave with a concurrent
        // registration for the same event.
        let created = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, event_id, user_id, contact_number, notes, status, registered_at, reviewed_by, reviewed_at)
             SELECT ?, ?, ?, ?, ?, 'PENDING', ?, NULL, NULL
             WHERE EXISTS (
                     SELECT 1 FROM events
                     WHERE id = ? AND status = 'PUBLISHED' AND date >= ?
                 )
               AND NOT EXISTS (
                     SELECT 1 FROM registrations
                     WHERE event_id = ? AND user_id = ? AND status IN ('PENDING', 'APPROVED')
                 )
               AND (
                     (SELECT max_participants FROM events WHERE id = ?) IS NULL
                     OR (SELECT COUNT(*) FROM registrations
                         WHERE event_id = ? AND status IN ('PENDING', 'APPROVED'))
                        < (SELECT max_participants FROM events WHERE id = ?)
                 )
             RETURNING *"
        )
            .bind(&registration.id)
            .bind(&registration.event_id)
            .bind(&registration.user_id)
            .bind(&registration.contact_number)
            .bind(&registration.notes)
            .bind(registration.registered_at)
            .bind(&registration.event_id)
            .bind(today)
            .bind(&registration.event_id)
            .bind(&registration.user_id)
            .bind(&registration.event_id)
            .bind(&registration.event_id)
            .bind(&registration.event_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        match created {
            Some(created) => Ok(created),
            None => Err(self.rejection_reason(&registration.event_id, &registration.user_id, today).await),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_approved(&self, event_id: &str, user_id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = ? AND user_id = ? AND status = 'APPROVED'"
        )
            .bind(event_id).bind(user_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = ? ORDER BY registered_at ASC"
        )
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE user_id = ? ORDER BY registered_at DESC"
        )
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_active(&self, event_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM registrations WHERE event_id = ? AND status IN ('PENDING', 'APPROVED')"
        )
            .bind(event_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn review(&self, id: &str, new_status: &str, reviewed_by: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = ?, reviewed_by = ?, reviewed_at = ?
             WHERE id = ? AND status = 'PENDING'
             RETURNING *"
        )
            .bind(new_status).bind(reviewed_by).bind(Utc::now()).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel_own(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = 'CANCELLED' WHERE id = ? AND status = 'PENDING' RETURNING *"
        )
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
