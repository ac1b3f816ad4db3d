use crate::models::events;

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct EventRepository {
    conn: PgPool,
}

impl EventRepository {
    pub fn new(conn: PgPool) -> Self {
        EventRepository { conn }
    }

    pub async fn new_event(&self, event: &events::NewEvent) -> Result<events::Event, anyhow::Error> {
        let event_id = Uuid::new_v4().hyphenated().to_string();

        let event = sqlx::query_as::<_, events::Event>(
            r#"INSERT INTO events
            (id, title, description, location, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .fetch_one(&self.conn)
        .await?;

        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> Result<Option<events::Event>, anyhow::Error> {
        let event = sqlx::query_as::<_, events::Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(event)
    }

    pub async fn list_events(&self) -> Result<Vec<events::Event>, anyhow::Error> {
        let events =
            sqlx::query_as::<_, events::Event>("SELECT * FROM events ORDER BY starts_at DESC")
                .fetch_all(&self.conn)
                .await?;

        Ok(events)
    }

    pub async fn list_upcoming_events(&self) -> Result<Vec<events::Event>, anyhow::Error> {
        let events = sqlx::query_as::<_, events::Event>(
            r#"SELECT * FROM events
            WHERE COALESCE(ends_at, starts_at) >= CURRENT_TIMESTAMP
            ORDER BY starts_at ASC"#,
        )
        .fetch_all(&self.conn)
        .await?;

        Ok(events)
    }

    pub async fn update_event(
        &self,
        id: &str,
        event: &events::NewEvent,
    ) -> Result<Option<events::Event>, anyhow::Error> {
        let event = sqlx::query_as::<_, events::Event>(
            r#"UPDATE events
            SET title = $1, description = $2, location = $3, starts_at = $4, ends_at = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $6
            RETURNING *"#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(event)
    }

    pub async fn delete_event(&self, id: &str) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
