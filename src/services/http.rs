use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

use super::{
    dashboard::DashboardRequest, events::EventRequest, members::MemberRequest, pix::PixRequest,
    tasks::TaskRequest, ServiceError,
};
use crate::models::site::Site;
use crate::store::Store;

pub mod access;
mod dashboard;
mod donation;
mod events;
mod members;
mod site;
mod tasks;

#[derive(Clone)]
pub struct AppState {
    pub pix_channel: mpsc::Sender<PixRequest>,
    pub event_channel: mpsc::Sender<EventRequest>,
    pub task_channel: mpsc::Sender<TaskRequest>,
    pub member_channel: mpsc::Sender<MemberRequest>,
    pub dashboard_channel: mpsc::Sender<DashboardRequest>,
    pub site: Arc<Store<Site>>,
    pub resolver: Arc<dyn access::AccessResolver>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    details: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, details: impl Into<String>) -> Self {
        ApiError {
            status,
            error,
            details: details.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Sign in first.")
    }

    pub fn forbidden(details: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", details)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(what) => {
                ApiError::new(StatusCode::NOT_FOUND, "Not found", format!("{} not found.", what))
            }
            ServiceError::InvalidRequest(reason) => {
                ApiError::new(StatusCode::BAD_REQUEST, "Invalid request", reason)
            }
            ServiceError::Database(_) | ServiceError::Repository(_, _) => {
                log::error!("{}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error",
                    "Could not complete the request.",
                )
            }
            other => {
                log::error!("{}", other);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    other.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.error,
                "details": self.details
            })),
        )
            .into_response()
    }
}

/// Sends a request to a service and waits for its reply.
pub(crate) async fn call<R, T>(
    channel: &mpsc::Sender<R>,
    request: impl FnOnce(oneshot::Sender<Result<T, ServiceError>>) -> R,
) -> Result<T, ServiceError> {
    let (response_tx, response_rx) = oneshot::channel();

    channel
        .send(request(response_tx))
        .await
        .map_err(|e| ServiceError::Communication("HTTP".to_string(), e.to_string()))?;

    response_rx
        .await
        .map_err(|e| ServiceError::Communication("HTTP".to_string(), e.to_string()))?
}

fn page(name: &'static str) -> Json<serde_json::Value> {
    Json(json!({ "page": name }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/login", get(|| async { page("login") }))
        .route("/pending", get(|| async { page("pending") }))
        .route("/admin", get(|| async { page("admin") }))
        .route("/api/site", get(site::get_site))
        .route("/api/donation/pix", get(donation::donation_code))
        .route("/api/events/upcoming", get(events::list_upcoming))
        .route("/api/me", get(members::me))
        .route("/api/admin/dashboard", get(dashboard::get_dashboard))
        .route(
            "/api/admin/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/admin/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/admin/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/admin/tasks/{id}",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/api/admin/tasks/{id}/status", put(tasks::set_task_status))
        .route("/api/admin/members", get(members::list_members))
        .route("/api/admin/members/{id}", get(members::get_member))
        .route("/api/admin/members/{id}/role", put(members::set_member_role))
        .route("/api/admin/site", put(site::update_site))
        .route("/api/admin/pix", post(donation::encode_payment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access::gate_request,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_http_server(state: AppState, listen: &str) -> Result<(), anyhow::Error> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
