use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, title, description, date, start_time, end_time, location, category, max_participants, status, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.title).bind(&event.description).bind(event.date)
            .bind(event.start_time).bind(event.end_time).bind(&event.location).bind(&event.category)
            .bind(event.max_participants).bind(&event.status).bind(&event.created_by).bind(event.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date ASC, start_time ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_visible(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status IN ('PUBLISHED', 'COMPLETED') ORDER BY date ASC, start_time ASC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET title=?, description=?, date=?, start_time=?, end_time=?, location=?, category=?, max_participants=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&event.title).bind(&event.description).bind(event.date).bind(event.start_time)
            .bind(event.end_time).bind(&event.location).bind(&event.category).bind(event.max_participants)
            .bind(&event.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn publish(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET status = 'PUBLISHED' WHERE id = ? AND status = 'DRAFT' RETURNING *"
        )
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn complete(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET status = 'COMPLETED' WHERE id = ? AND status = 'PUBLISHED' RETURNING *"
        )
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str) -> Result<Option<Event>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Event>(
            "UPDATE events SET status = 'CANCELLED' WHERE id = ? AND status IN ('DRAFT', 'PUBLISHED') RETURNING *"
        )
            .bind(id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let Some(cancelled) = cancelled else {
            return Ok(None);
        };

        // Active registrations die with the event so they never count against
        // capacity again.
        sqlx::query(
            "UPDATE registrations SET status = 'CANCELLED' WHERE event_id = ? AND status IN ('PENDING', 'APPROVED')"
        )
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(cancelled))
    }

    async fn delete_draft(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ? AND status = 'DRAFT'")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
