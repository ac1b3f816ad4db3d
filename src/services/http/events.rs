use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{call, ApiError, AppState};
use crate::models::events::{Event, NewEvent};
use crate::services::events::EventRequest;

pub async fn list_upcoming(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = call(&state.event_channel, |response| EventRequest::ListUpcoming {
        response,
    })
    .await?;

    Ok(Json(events))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = call(&state.event_channel, |response| EventRequest::ListEvents {
        response,
    })
    .await?;

    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event = call(&state.event_channel, |response| EventRequest::GetEvent {
        id,
        response,
    })
    .await?;

    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(event): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = call(&state.event_channel, |response| EventRequest::CreateEvent {
        event,
        response,
    })
    .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<NewEvent>,
) -> Result<Json<Event>, ApiError> {
    let event = call(&state.event_channel, |response| EventRequest::UpdateEvent {
        id,
        event,
        response,
    })
    .await?;

    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    call(&state.event_channel, |response| EventRequest::DeleteEvent {
        id,
        response,
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
