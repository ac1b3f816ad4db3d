use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a PIX copy-and-paste code asks the payer for.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PaymentRequest {
    pub pix_key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub description: String,
    pub amount: Option<Decimal>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DonationQuery {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DonationCode {
    pub pix_key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub code: String,
}
