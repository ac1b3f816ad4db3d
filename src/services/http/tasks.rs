use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{call, ApiError, AppState};
use crate::models::tasks::{NewTask, StatusChange, Task, TaskFilter};
use crate::services::tasks::TaskRequest;

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = call(&state.task_channel, |response| TaskRequest::ListTasks {
        filter,
        response,
    })
    .await?;

    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = call(&state.task_channel, |response| TaskRequest::CreateTask {
        task,
        response,
    })
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(task): Json<NewTask>,
) -> Result<Json<Task>, ApiError> {
    let task = call(&state.task_channel, |response| TaskRequest::UpdateTask {
        id,
        task,
        response,
    })
    .await?;

    Ok(Json(task))
}

pub async fn set_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Task>, ApiError> {
    let task = call(&state.task_channel, |response| TaskRequest::SetStatus {
        id,
        status: change.status,
        response,
    })
    .await?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    call(&state.task_channel, |response| TaskRequest::DeleteTask { id, response }).await?;

    Ok(StatusCode::NO_CONTENT)
}
