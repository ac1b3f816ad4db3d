use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::pix::PaymentRequest;
use crate::settings::Church;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub pix_key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub donation_description: String,
}

impl From<Church> for Site {
    fn from(church: Church) -> Self {
        Site {
            name: church.name,
            pix_key: church.pix_key,
            merchant_name: church.merchant_name,
            merchant_city: church.merchant_city,
            donation_description: church.donation_description,
        }
    }
}

/// Partial update sent by the back-office. Absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SiteUpdate {
    pub name: Option<String>,
    pub pix_key: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_city: Option<String>,
    pub donation_description: Option<String>,
}

impl Site {
    /// Donation request to the church's own key.
    pub fn payment_request(
        &self,
        amount: Option<Decimal>,
        description: Option<String>,
    ) -> PaymentRequest {
        PaymentRequest {
            pix_key: self.pix_key.clone(),
            merchant_name: self.merchant_name.clone(),
            merchant_city: self.merchant_city.clone(),
            description: description.unwrap_or_else(|| self.donation_description.clone()),
            amount,
        }
    }

    pub fn apply(&mut self, update: SiteUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(pix_key) = update.pix_key {
            self.pix_key = pix_key;
        }
        if let Some(merchant_name) = update.merchant_name {
            self.merchant_name = merchant_name;
        }
        if let Some(merchant_city) = update.merchant_city {
            self.merchant_city = merchant_city;
        }
        if let Some(description) = update.donation_description {
            self.donation_description = description;
        }
    }
}
