use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::pix::{DonationCode, PaymentRequest};
use crate::models::site::Site;
use crate::pix;
use crate::store::Store;

pub enum PixRequest {
    DonationCode {
        amount: Option<Decimal>,
        description: Option<String>,
        response: oneshot::Sender<Result<DonationCode, ServiceError>>,
    },
    Encode {
        request: PaymentRequest,
        response: oneshot::Sender<Result<String, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct PixRequestHandler {
    site: Arc<Store<Site>>,
}

impl PixRequestHandler {
    pub fn new(site: Arc<Store<Site>>) -> Self {
        PixRequestHandler { site }
    }

    fn donation_code(
        &self,
        amount: Option<Decimal>,
        description: Option<String>,
    ) -> Result<DonationCode, ServiceError> {
        let site = self.site.get()?;
        let code = self.encode(&site.payment_request(amount, description))?;

        Ok(DonationCode {
            pix_key: site.pix_key,
            merchant_name: site.merchant_name,
            merchant_city: site.merchant_city,
            code,
        })
    }

    fn encode(&self, request: &PaymentRequest) -> Result<String, ServiceError> {
        pix::encode(request).map_err(|e| {
            log::warn!("Rejected payment request: {}", e);
            ServiceError::InvalidRequest(e.to_string())
        })
    }
}

#[async_trait]
impl RequestHandler<PixRequest> for PixRequestHandler {
    async fn handle_request(&self, request: PixRequest) {
        match request {
            PixRequest::DonationCode {
                amount,
                description,
                response,
            } => {
                let code = self.donation_code(amount, description);
                let _ = response.send(code);
            }
            PixRequest::Encode { request, response } => {
                let code = self.encode(&request);
                let _ = response.send(code);
            }
        }
    }
}

pub struct PixService;

impl PixService {
    pub fn new() -> Self {
        PixService {}
    }
}

#[async_trait]
impl Service<PixRequest, PixRequestHandler> for PixService {}
