use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::models::site::Site;
use crate::repositories::auth::AuthApi;
use crate::settings::Settings;
use crate::store::{Store, StoreError};

pub mod dashboard;
pub mod events;
pub mod http;
pub mod members;
pub mod pix;
pub mod tasks;

const CHANNEL_CAPACITY: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(
    pool: PgPool,
    settings: Settings,
    site: Arc<Store<Site>>,
) -> Result<(), anyhow::Error> {
    let (pix_tx, mut pix_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_tx, mut event_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (task_tx, mut task_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (member_tx, mut member_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (dashboard_tx, mut dashboard_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let mut pix_service = pix::PixService::new();
    let mut event_service = events::EventService::new();
    let mut task_service = tasks::TaskService::new();
    let mut member_service = members::MemberService::new();
    let mut dashboard_service = dashboard::DashboardService::new();

    log::info!("Starting Pix service.");
    let pix_site = site.clone();
    tokio::spawn(async move {
        pix_service
            .run(pix::PixRequestHandler::new(pix_site), &mut pix_rx)
            .await;
    });

    log::info!("Starting event service.");
    let event_pool = pool.clone();
    tokio::spawn(async move {
        event_service
            .run(events::EventRequestHandler::new(event_pool), &mut event_rx)
            .await;
    });

    log::info!("Starting task service.");
    let task_pool = pool.clone();
    tokio::spawn(async move {
        task_service
            .run(tasks::TaskRequestHandler::new(task_pool), &mut task_rx)
            .await;
    });

    log::info!("Starting member service.");
    let member_pool = pool.clone();
    tokio::spawn(async move {
        member_service
            .run(members::MemberRequestHandler::new(member_pool), &mut member_rx)
            .await;
    });

    log::info!("Starting dashboard service.");
    let dashboard_pool = pool.clone();
    tokio::spawn(async move {
        dashboard_service
            .run(
                dashboard::DashboardRequestHandler::new(dashboard_pool),
                &mut dashboard_rx,
            )
            .await;
    });

    let auth_api = AuthApi::new(settings.auth.api_key, settings.auth.url);
    let resolver = http::access::MemberResolver::new(auth_api, member_tx.clone());
    let app_state = http::AppState {
        pix_channel: pix_tx,
        event_channel: event_tx,
        task_channel: task_tx,
        member_channel: member_tx,
        dashboard_channel: dashboard_tx,
        site,
        resolver: Arc::new(resolver),
    };

    log::info!("Starting HTTP server.");
    http::start_http_server(app_state, &settings.server.listen).await
}
