//! Static PIX "copia e cola" codes (BR Code).
//!
//! A payload is a run of `ID` + `LENGTH` + `VALUE` fields, where `ID` and
//! `LENGTH` are two decimal digits and `LENGTH` counts the bytes of `VALUE`.
//! It always ends with the CRC field `6304XXXX`, computed over everything up
//! to and including `6304`.

use rust_decimal::Decimal;

use crate::models::pix::PaymentRequest;

mod crc;
mod sanitize;

pub use crc::crc16_ccitt_false;

const ID_PAYLOAD_FORMAT: &str = "00";
const ID_MERCHANT_ACCOUNT: &str = "26";
const ID_MERCHANT_CATEGORY: &str = "52";
const ID_CURRENCY: &str = "53";
const ID_AMOUNT: &str = "54";
const ID_COUNTRY: &str = "58";
const ID_MERCHANT_NAME: &str = "59";
const ID_MERCHANT_CITY: &str = "60";
const ID_ADDITIONAL_DATA: &str = "62";
const ID_CRC: &str = "63";

const ID_ACCOUNT_GUI: &str = "00";
const ID_ACCOUNT_KEY: &str = "01";
const ID_REFERENCE_LABEL: &str = "05";

const PAYLOAD_FORMAT: &str = "01";
const PIX_GUI: &str = "BR.GOV.BCB.PIX";
const MERCHANT_CATEGORY: &str = "0000";
const CURRENCY_BRL: &str = "986";
const COUNTRY: &str = "BR";
const NO_REFERENCE_LABEL: &str = "***";

const MAX_VALUE_LEN: usize = 99;
// The key shares field 26 with the GUI sub-field and its own ID and length.
const MAX_PIX_KEY_LEN: usize = MAX_VALUE_LEN - 4 - PIX_GUI.len() - 4;
const MAX_AMOUNT_LEN: usize = 13;
pub const MAX_MERCHANT_NAME_LEN: usize = 25;
pub const MAX_MERCHANT_CITY_LEN: usize = 15;
pub const MAX_REFERENCE_LABEL_LEN: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixError {
    #[error("Invalid payment request: {0}")]
    InvalidPaymentRequest(String),
}

fn invalid(reason: impl Into<String>) -> PixError {
    PixError::InvalidPaymentRequest(reason.into())
}

fn field(id: &str, value: &str) -> Result<String, PixError> {
    if value.len() > MAX_VALUE_LEN {
        return Err(invalid(format!(
            "field {} is {} bytes long, the limit is {}",
            id,
            value.len(),
            MAX_VALUE_LEN
        )));
    }

    Ok(format!("{}{:02}{}", id, value.len(), value))
}

fn format_amount(amount: Decimal) -> Result<String, PixError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid("amount is negative"));
    }
    if amount.is_zero() {
        return Err(invalid("amount must be greater than zero"));
    }
    if amount.normalize().scale() > 2 {
        return Err(invalid("amount has more than 2 decimal places"));
    }

    let mut amount = amount;
    amount.rescale(2);
    let text = amount.to_string();
    if text.len() > MAX_AMOUNT_LEN {
        return Err(invalid("amount is too large"));
    }

    Ok(text)
}

/// Encodes `request` as a static PIX code.
///
/// Name and city are normalised to the BR Code character set and cut to
/// their field limits; the description becomes the reference label, `***`
/// when nothing usable is left of it.
pub fn encode(request: &PaymentRequest) -> Result<String, PixError> {
    let pix_key = request.pix_key.trim();
    if pix_key.is_empty() {
        return Err(invalid("pix key is empty"));
    }
    if pix_key.len() > MAX_PIX_KEY_LEN {
        return Err(invalid(format!(
            "pix key is longer than {} bytes",
            MAX_PIX_KEY_LEN
        )));
    }

    let merchant_name = sanitize::merchant_text(&request.merchant_name, MAX_MERCHANT_NAME_LEN);
    if merchant_name.is_empty() {
        return Err(invalid("merchant name is empty"));
    }

    let merchant_city = sanitize::merchant_text(&request.merchant_city, MAX_MERCHANT_CITY_LEN);
    if merchant_city.is_empty() {
        return Err(invalid("merchant city is empty"));
    }

    let mut reference_label =
        sanitize::reference_label(&request.description, MAX_REFERENCE_LABEL_LEN);
    if reference_label.is_empty() {
        reference_label = NO_REFERENCE_LABEL.to_string();
    }

    let amount = request.amount.map(format_amount).transpose()?;

    let merchant_account = [
        field(ID_ACCOUNT_GUI, PIX_GUI)?,
        field(ID_ACCOUNT_KEY, pix_key)?,
    ]
    .concat();
    let additional_data = field(ID_REFERENCE_LABEL, &reference_label)?;

    let mut payload = String::with_capacity(160);
    payload.push_str(&field(ID_PAYLOAD_FORMAT, PAYLOAD_FORMAT)?);
    payload.push_str(&field(ID_MERCHANT_ACCOUNT, &merchant_account)?);
    payload.push_str(&field(ID_MERCHANT_CATEGORY, MERCHANT_CATEGORY)?);
    payload.push_str(&field(ID_CURRENCY, CURRENCY_BRL)?);
    if let Some(amount) = amount {
        payload.push_str(&field(ID_AMOUNT, &amount)?);
    }
    payload.push_str(&field(ID_COUNTRY, COUNTRY)?);
    payload.push_str(&field(ID_MERCHANT_NAME, &merchant_name)?);
    payload.push_str(&field(ID_MERCHANT_CITY, &merchant_city)?);
    payload.push_str(&field(ID_ADDITIONAL_DATA, &additional_data)?);

    payload.push_str(ID_CRC);
    payload.push_str("04");
    let crc = crc16_ccitt_false(payload.as_bytes());
    payload.push_str(&format!("{:04X}", crc));

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request(amount: Option<&str>) -> PaymentRequest {
        PaymentRequest {
            pix_key: "11999998888".to_string(),
            merchant_name: "IGREJA VIVA".to_string(),
            merchant_city: "SAO PAULO".to_string(),
            description: "DOACAO".to_string(),
            amount: amount.map(|a| Decimal::from_str(a).unwrap()),
        }
    }

    /// Splits a TLV run into (id, value) pairs, checking every declared length.
    fn parse_fields(payload: &str) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        let mut rest = payload;
        while !rest.is_empty() {
            assert!(rest.len() >= 4, "truncated field header in {:?}", rest);
            let id = &rest[0..2];
            let len: usize = rest[2..4].parse().expect("length is two digits");
            assert!(rest.len() >= 4 + len, "field {} overflows payload", id);
            fields.push((id.to_string(), rest[4..4 + len].to_string()));
            rest = &rest[4 + len..];
        }
        fields
    }

    fn assert_valid_crc(payload: &str) {
        let (prefix, checksum) = payload.split_at(payload.len() - 4);
        assert!(prefix.ends_with("6304"));
        let expected = format!("{:04X}", crc16_ccitt_false(prefix.as_bytes()));
        assert_eq!(checksum, expected);
    }

    #[test]
    fn test_encode_without_amount() {
        let code = encode(&request(None)).unwrap();

        assert_eq!(
            code,
            "00020126330014BR.GOV.BCB.PIX0111119999988885204000053039865802BR\
             5911IGREJA VIVA6009SAO PAULO62100506DOACAO63047682"
        );
        assert!(code.starts_with("000201"));
        assert!(code.contains("0014BR.GOV.BCB.PIX"));
        assert!(code.contains("5911IGREJA VIVA"));
        assert!(code.contains("6009SAO PAULO"));
        assert!(parse_fields(&code).iter().all(|(id, _)| id != "54"));
        assert_valid_crc(&code);
    }

    #[test]
    fn test_encode_with_amount() {
        let code = encode(&request(Some("15.50"))).unwrap();

        assert_eq!(
            code,
            "00020126330014BR.GOV.BCB.PIX011111999998888520400005303986540515.50\
             5802BR5911IGREJA VIVA6009SAO PAULO62100506DOACAO630445BD"
        );

        let ids: Vec<String> = parse_fields(&code).into_iter().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            vec!["00", "26", "52", "53", "54", "58", "59", "60", "62", "63"]
        );
    }

    #[test]
    fn test_amount_is_padded_to_two_decimals() {
        let code = encode(&request(Some("100"))).unwrap();
        assert!(code.contains("5406100.00"));

        let code = encode(&request(Some("7.5"))).unwrap();
        assert!(code.contains("54047.50"));

        // Trailing zeros beyond the cents are not extra precision.
        let code = encode(&request(Some("2.500"))).unwrap();
        assert!(code.contains("54042.50"));
    }

    #[test]
    fn test_every_declared_length_matches() {
        let mut req = request(Some("1234.56"));
        req.pix_key = "0f3c2a9e-6f1d-4b8a-9c3e-2d7f5a1b8e40".to_string();
        req.merchant_name = "Igreja Evangélica Assembleia de Deus".to_string();
        req.merchant_city = "São José dos Campos".to_string();
        req.description = "Oferta missionária".to_string();

        let code = encode(&req).unwrap();
        assert_valid_crc(&code);

        for (id, value) in parse_fields(&code) {
            match id.as_str() {
                "26" => {
                    let nested = parse_fields(&value);
                    assert_eq!(nested[0], ("00".to_string(), "BR.GOV.BCB.PIX".to_string()));
                    assert_eq!(nested[1].1, req.pix_key);
                }
                "59" => assert_eq!(value, "IGREJA EVANGELICA ASSEMBL"),
                "60" => assert_eq!(value, "SAO JOSE DOS CA"),
                "62" => {
                    let nested = parse_fields(&value);
                    assert_eq!(
                        nested,
                        vec![("05".to_string(), "OFERTAMISSIONARIA".to_string())]
                    );
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_long_merchant_name_is_truncated() {
        let mut req = request(None);
        req.merchant_name = "IGREJA PRESBITERIANA INDEPENDENTE DO BRASIL".to_string();

        let code = encode(&req).unwrap();
        let name = parse_fields(&code)
            .into_iter()
            .find(|(id, _)| id == "59")
            .map(|(_, value)| value)
            .unwrap();
        assert_eq!(name.len(), MAX_MERCHANT_NAME_LEN);
        assert_eq!(name, "IGREJA PRESBITERIANA INDE");
    }

    #[test]
    fn test_empty_description_uses_placeholder() {
        let mut req = request(None);
        req.pix_key = "contato@igreja.org".to_string();
        req.merchant_name = "Igreja Batista São João".to_string();
        req.description = "  ".to_string();

        let code = encode(&req).unwrap();
        assert_eq!(
            code,
            "00020126400014BR.GOV.BCB.PIX0118contato@igreja.org5204000053039865802BR\
             5923IGREJA BATISTA SAO JOAO6009SAO PAULO62070503***6304C34C"
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let req = request(Some("42.00"));
        assert_eq!(encode(&req).unwrap(), encode(&req).unwrap());
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let mut req = request(None);
        req.pix_key = "   ".to_string();
        assert!(matches!(encode(&req), Err(PixError::InvalidPaymentRequest(_))));

        let mut req = request(None);
        req.pix_key = "k".repeat(78);
        assert!(encode(&req).is_err());
        req.pix_key = "k".repeat(77);
        assert!(encode(&req).is_ok());

        for amount in ["-1.00", "0", "0.00", "10.005", "12345678901.00"] {
            let req = request(Some(amount));
            assert!(
                matches!(encode(&req), Err(PixError::InvalidPaymentRequest(_))),
                "amount {} should be rejected",
                amount
            );
        }

        let mut req = request(None);
        req.merchant_name = "✝✝✝".to_string();
        assert!(encode(&req).is_err());

        let mut req = request(None);
        req.merchant_city = String::new();
        assert!(encode(&req).is_err());
    }
}
