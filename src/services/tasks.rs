use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::tasks::{self, TaskStatus};
use crate::repositories::tasks::TaskRepository;

pub enum TaskRequest {
    ListTasks {
        filter: tasks::TaskFilter,
        response: oneshot::Sender<Result<Vec<tasks::Task>, ServiceError>>,
    },
    CreateTask {
        task: tasks::NewTask,
        response: oneshot::Sender<Result<tasks::Task, ServiceError>>,
    },
    UpdateTask {
        id: String,
        task: tasks::NewTask,
        response: oneshot::Sender<Result<tasks::Task, ServiceError>>,
    },
    SetStatus {
        id: String,
        status: TaskStatus,
        response: oneshot::Sender<Result<tasks::Task, ServiceError>>,
    },
    DeleteTask {
        id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct TaskRequestHandler {
    repository: TaskRepository,
}

fn repository_error(e: anyhow::Error) -> ServiceError {
    // A task pointing at a missing event or member is the caller's mistake.
    if let Some(sqlx::Error::Database(db)) = e.downcast_ref::<sqlx::Error>() {
        if db.is_foreign_key_violation() {
            let reference = match db.constraint() {
                Some(constraint) if constraint.contains("assignee") => "assignee",
                Some(constraint) if constraint.contains("event") => "event",
                _ => "event or assignee",
            };
            return ServiceError::InvalidRequest(format!("Unknown {} for task.", reference));
        }
    }

    ServiceError::Repository("Tasks".to_string(), e.to_string())
}

impl TaskRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = TaskRepository::new(sql_conn);

        TaskRequestHandler { repository }
    }

    async fn list_tasks(
        &self,
        filter: tasks::TaskFilter,
    ) -> Result<Vec<tasks::Task>, ServiceError> {
        self.repository
            .list_tasks(&filter)
            .await
            .map_err(repository_error)
    }

    async fn create_task(&self, task: tasks::NewTask) -> Result<tasks::Task, ServiceError> {
        task.validate().map_err(ServiceError::InvalidRequest)?;

        let task = self
            .repository
            .new_task(&task)
            .await
            .map_err(repository_error)?;

        log::info!(
            "Created task {} assigned to {}.",
            task.id,
            task.assignee_id.as_deref().unwrap_or("nobody")
        );
        Ok(task)
    }

    async fn update_task(
        &self,
        id: &str,
        task: tasks::NewTask,
    ) -> Result<tasks::Task, ServiceError> {
        task.validate().map_err(ServiceError::InvalidRequest)?;

        self.repository
            .update_task(id, &task)
            .await
            .map_err(repository_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Task {}", id)))
    }

    async fn set_status(&self, id: &str, status: TaskStatus) -> Result<tasks::Task, ServiceError> {
        self.repository
            .update_task_status(id, status)
            .await
            .map_err(repository_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Task {}", id)))
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        if !self.repository.delete_task(id).await.map_err(repository_error)? {
            return Err(ServiceError::NotFound(format!("Task {}", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl RequestHandler<TaskRequest> for TaskRequestHandler {
    async fn handle_request(&self, request: TaskRequest) {
        match request {
            TaskRequest::ListTasks { filter, response } => {
                let _ = response.send(self.list_tasks(filter).await);
            }
            TaskRequest::CreateTask { task, response } => {
                let _ = response.send(self.create_task(task).await);
            }
            TaskRequest::UpdateTask { id, task, response } => {
                let _ = response.send(self.update_task(&id, task).await);
            }
            TaskRequest::SetStatus {
                id,
                status,
                response,
            } => {
                let _ = response.send(self.set_status(&id, status).await);
            }
            TaskRequest::DeleteTask { id, response } => {
                let _ = response.send(self.delete_task(&id).await);
            }
        }
    }
}

pub struct TaskService;

impl TaskService {
    pub fn new() -> Self {
        TaskService {}
    }
}

#[async_trait]
impl Service<TaskRequest, TaskRequestHandler> for TaskService {}
