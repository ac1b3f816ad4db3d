use axum::{extract::State, Extension, Json};

use super::{access::Session, ApiError, AppState};
use crate::models::site::{Site, SiteUpdate};
use crate::pix;
use crate::services::ServiceError;

pub async fn get_site(State(state): State<AppState>) -> Result<Json<Site>, ApiError> {
    let site = state.site.get().map_err(ServiceError::from)?;

    Ok(Json(site))
}

pub async fn update_site(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(update): Json<SiteUpdate>,
) -> Result<Json<Site>, ApiError> {
    let admin = session.require_admin()?;

    // The public donation code must still encode after the change.
    let site = state.site.update(|site| {
        site.apply(update);
        pix::encode(&site.payment_request(None, None))
            .map(|_| ())
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))
    })?;

    log::info!("Site settings updated by {}.", admin.id);
    Ok(Json(site))
}
