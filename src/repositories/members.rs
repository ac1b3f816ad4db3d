use crate::models::members::{self, Role};

use sqlx::PgPool;

#[derive(Clone)]
pub struct MemberRepository {
    conn: PgPool,
}

impl MemberRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    /// Returns the member with `id`, creating it as pending when first seen.
    pub async fn ensure_member(
        &self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<members::Member, anyhow::Error> {
        let member = sqlx::query_as::<_, members::Member>(
            r#"
                INSERT INTO members (id, name, email, role)
                VALUES ($1, $2, $3, 'pending')
                ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
                RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.conn)
        .await?;

        Ok(member)
    }

    pub async fn get_member(&self, id: &str) -> Result<Option<members::Member>, anyhow::Error> {
        let member = sqlx::query_as::<_, members::Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(member)
    }

    pub async fn list_members(&self) -> Result<Vec<members::Member>, anyhow::Error> {
        let members = sqlx::query_as::<_, members::Member>(
            "SELECT * FROM members ORDER BY role, name",
        )
        .fetch_all(&self.conn)
        .await?;

        Ok(members)
    }

    pub async fn set_role(
        &self,
        id: &str,
        role: Role,
    ) -> Result<Option<members::Member>, anyhow::Error> {
        let member = sqlx::query_as::<_, members::Member>(
            "UPDATE members SET role = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
        )
        .bind(role.as_str())
        .bind(id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(member)
    }
}
