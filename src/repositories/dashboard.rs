use crate::models::dashboard::Dashboard;

use sqlx::PgPool;

#[derive(Clone)]
pub struct DashboardRepository {
    conn: PgPool,
}

impl DashboardRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    pub async fn get_dashboard(&self) -> Result<Dashboard, anyhow::Error> {
        let (pending_members, members, admins): (i64, i64, i64) = sqlx::query_as(
            r#"SELECT
            COUNT(1) FILTER (WHERE role = 'pending'),
            COUNT(1) FILTER (WHERE role = 'member'),
            COUNT(1) FILTER (WHERE role = 'admin')
            FROM members"#,
        )
        .fetch_one(&self.conn)
        .await?;

        let upcoming_events: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM events WHERE COALESCE(ends_at, starts_at) >= CURRENT_TIMESTAMP",
        )
        .fetch_one(&self.conn)
        .await?;

        let (open_tasks, done_tasks): (i64, i64) = sqlx::query_as(
            r#"SELECT
            COUNT(1) FILTER (WHERE status = 'open'),
            COUNT(1) FILTER (WHERE status = 'done')
            FROM tasks"#,
        )
        .fetch_one(&self.conn)
        .await?;

        Ok(Dashboard {
            pending_members,
            members,
            admins,
            upcoming_events,
            open_tasks,
            done_tasks,
        })
    }
}
