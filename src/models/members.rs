use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pending,
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pending => "pending",
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Role::Pending),
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Member {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_else(|e| {
            log::warn!("Member {}: {}, treating as pending.", self.id, e);
            Role::Pending
        })
    }
}

/// A user as the auth service reports it.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    pub fn display_name(&self) -> String {
        self.user_metadata
            .get("full_name")
            .or_else(|| self.user_metadata.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.id.clone())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_round_trips_through_text() {
        for role in [Role::Pending, Role::Member, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("pastor".parse::<Role>().is_err());
    }

    #[test]
    fn test_unknown_role_is_pending() {
        let now = chrono::Utc::now().naive_utc();
        let member = Member {
            id: "m1".to_string(),
            name: "Ana".to_string(),
            email: "ana@igreja.org".to_string(),
            role: "pastor".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(member.role(), Role::Pending);
    }

    #[test]
    fn test_display_name_prefers_metadata() {
        let user = AuthUser {
            id: "u1".to_string(),
            email: Some("ana@igreja.org".to_string()),
            user_metadata: json!({"full_name": "Ana Souza"}),
        };
        assert_eq!(user.display_name(), "Ana Souza");

        let user = AuthUser {
            id: "u2".to_string(),
            email: Some("joao@igreja.org".to_string()),
            user_metadata: serde_json::Value::Null,
        };
        assert_eq!(user.display_name(), "joao@igreja.org");
    }
}
