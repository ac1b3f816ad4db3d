use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_id: Option<String>,
    pub assignee_id: Option<String>,
    pub status: String,
    pub due_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_id: Option<String>,
    pub assignee_id: Option<String>,
    pub due_date: Option<chrono::NaiveDate>,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Task title is required.".to_string());
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub event_id: Option<String>,
    pub assignee_id: Option<String>,
    pub status: Option<TaskStatus>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatusChange {
    pub status: TaskStatus,
}
