use crate::models::tasks::{self, TaskStatus};

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskRepository {
    conn: PgPool,
}

impl TaskRepository {
    pub fn new(conn: PgPool) -> Self {
        TaskRepository { conn }
    }

    pub async fn new_task(&self, task: &tasks::NewTask) -> Result<tasks::Task, anyhow::Error> {
        let task_id = Uuid::new_v4().hyphenated().to_string();

        let task = sqlx::query_as::<_, tasks::Task>(
            r#"INSERT INTO tasks
            (id, title, description, event_id, assignee_id, status, due_date)
            VALUES ($1, $2, $3, $4, $5, 'open', $6)
            RETURNING *
            "#,
        )
        .bind(task_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.event_id)
        .bind(&task.assignee_id)
        .bind(task.due_date)
        .fetch_one(&self.conn)
        .await?;

        Ok(task)
    }

    pub async fn list_tasks(
        &self,
        filter: &tasks::TaskFilter,
    ) -> Result<Vec<tasks::Task>, anyhow::Error> {
        // NULL filters match everything.
        let tasks = sqlx::query_as::<_, tasks::Task>(
            r#"SELECT * FROM tasks
            WHERE ($1::TEXT IS NULL OR event_id = $1)
              AND ($2::TEXT IS NULL OR assignee_id = $2)
              AND ($3::TEXT IS NULL OR status = $3)
            ORDER BY due_date ASC NULLS LAST, created_at ASC"#,
        )
        .bind(&filter.event_id)
        .bind(&filter.assignee_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.conn)
        .await?;

        Ok(tasks)
    }

    pub async fn update_task(
        &self,
        id: &str,
        task: &tasks::NewTask,
    ) -> Result<Option<tasks::Task>, anyhow::Error> {
        let task = sqlx::query_as::<_, tasks::Task>(
            r#"UPDATE tasks
            SET title = $1, description = $2, event_id = $3, assignee_id = $4, due_date = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $6
            RETURNING *"#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.event_id)
        .bind(&task.assignee_id)
        .bind(task.due_date)
        .bind(id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(task)
    }

    pub async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> Result<Option<tasks::Task>, anyhow::Error> {
        let task = sqlx::query_as::<_, tasks::Task>(
            "UPDATE tasks SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(task)
    }

    pub async fn delete_task(&self, id: &str) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
