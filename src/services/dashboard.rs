use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::dashboard::Dashboard;
use crate::repositories::dashboard::DashboardRepository;

pub enum DashboardRequest {
    GetDashboard {
        response: oneshot::Sender<Result<Dashboard, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct DashboardRequestHandler {
    repository: DashboardRepository,
}

impl DashboardRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = DashboardRepository::new(sql_conn);

        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<DashboardRequest> for DashboardRequestHandler {
    async fn handle_request(&self, request: DashboardRequest) {
        match request {
            DashboardRequest::GetDashboard { response } => {
                let dashboard = self
                    .repository
                    .get_dashboard()
                    .await
                    .map_err(|e| ServiceError::Database(e.to_string()));
                let _ = response.send(dashboard);
            }
        }
    }
}

pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Service<DashboardRequest, DashboardRequestHandler> for DashboardService {}
