//! WhatsApp webhook signature verification.
//!
//! Meta signs every webhook delivery with HMAC-SHA256 over the raw body,
//! sent as `X-Hub-Signature-256: sha256=<hex>`. Verification uses a
//! constant-time comparison.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failures.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SignatureError {
    #[error("malformed signature header: {0}")]
    ParseError(String),

    #[error("signature mismatch")]
    InvalidSignature,
}

/// Verifier for `X-Hub-Signature-256` headers.
pub struct SignatureVerifier {
    app_secret: Secret<String>,
}

impl SignatureVerifier {
    /// Creates a verifier with the Meta app secret.
    pub fn new(app_secret: impl Into<String>) -> Self {
        Self {
            app_secret: Secret::new(app_secret.into()),
        }
    }

    /// Verifies the header against the raw request body.
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), SignatureError> {
        let hex_signature = signature_header
            .strip_prefix("sha256=")
            .ok_or_else(|| SignatureError::ParseError("missing sha256= prefix".to_string()))?;

        let expected = hex::decode(hex_signature)
            .map_err(|_| SignatureError::ParseError("invalid hex".to_string()))?;

        let mut mac = HmacSha256::new_from_slice(self.app_secret.expose_secret().as_bytes())
            .map_err(|_| SignatureError::ParseError("invalid secret length".to_string()))?;
        mac.update(payload);
        let computed = mac.finalize().into_bytes();

        if computed.ct_eq(expected.as_slice()).into() {
            Ok(())
        } else {
            Err(SignatureError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn valid_signature_verifies() {
        let verifier = SignatureVerifier::new("app-secret");
        let payload = br#"{"object":"whatsapp_business_account"}"#;
        let header = sign("app-secret", payload);

        assert!(verifier.verify(payload, &header).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = SignatureVerifier::new("app-secret");
        let payload = b"payload";
        let header = sign("other-secret", payload);

        assert_eq!(
            verifier.verify(payload, &header),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let verifier = SignatureVerifier::new("app-secret");
        let header = sign("app-secret", b"original");

        assert_eq!(
            verifier.verify(b"tampered", &header),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn missing_prefix_is_a_parse_error() {
        let verifier = SignatureVerifier::new("app-secret");
        let result = verifier.verify(b"payload", "deadbeef");
        assert!(matches!(result, Err(SignatureError::ParseError(_))));
    }

    #[test]
    fn invalid_hex_is_a_parse_error() {
        let verifier = SignatureVerifier::new("app-secret");
        let result = verifier.verify(b"payload", "sha256=not-hex");
        assert!(matches!(result, Err(SignatureError::ParseError(_))));
    }
}
