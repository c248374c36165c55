//! Payloads for the user authentication API.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Body of the generate-OTP request.
#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub mobile: String,
}

/// Transaction handle returned once an OTP has been sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpResponse {
    pub txn_id: String,
}

/// Body of the confirm-OTP request. The API expects the OTP as a
/// lowercase hex SHA-256 digest, never in clear text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpConfirmation {
    pub otp: String,
    pub txn_id: String,
}

impl OtpConfirmation {
    pub fn new(otp: &str, txn_id: &str) -> Self {
        Self {
            otp: hex::encode(Sha256::digest(otp.trim().as_bytes())),
            txn_id: txn_id.to_string(),
        }
    }
}

/// Bearer token issued after a confirmed OTP.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_hashes_otp() {
        let body = OtpConfirmation::new("123456", "txn-1");
        assert_eq!(
            body.otp,
            "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["txnId"], "txn-1");
    }

    #[test]
    fn test_otp_response_uses_camel_case() {
        let response: OtpResponse =
            serde_json::from_str(r#"{"txnId": "a1b2c3"}"#).unwrap();
        assert_eq!(response.txn_id, "a1b2c3");
    }
}
