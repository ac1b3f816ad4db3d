use axum::{extract::State, Json};

use super::{call, ApiError, AppState};
use crate::models::dashboard::Dashboard;
use crate::services::dashboard::DashboardRequest;

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = call(&state.dashboard_channel, |response| {
        DashboardRequest::GetDashboard { response }
    })
    .await?;

    Ok(Json(dashboard))
}
