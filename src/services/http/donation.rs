use axum::{
    extract::{Query, State},
    Json,
};

use super::{call, ApiError, AppState};
use crate::models::pix::{DonationCode, DonationQuery, PaymentRequest};
use crate::services::pix::PixRequest;

pub async fn donation_code(
    State(state): State<AppState>,
    Query(query): Query<DonationQuery>,
) -> Result<Json<DonationCode>, ApiError> {
    let code = call(&state.pix_channel, |response| PixRequest::DonationCode {
        amount: query.amount,
        description: query.description,
        response,
    })
    .await?;

    Ok(Json(code))
}

#[derive(serde::Serialize)]
pub struct EncodedPayment {
    code: String,
}

pub async fn encode_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<EncodedPayment>, ApiError> {
    let code = call(&state.pix_channel, |response| PixRequest::Encode {
        request,
        response,
    })
    .await?;

    Ok(Json(EncodedPayment { code }))
}
