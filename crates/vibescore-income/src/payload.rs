//! Base64url codec for the standalone harness payload `{ data, options }`.

use crate::domain::ScoreOptions;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything one scoring call needs, as carried by the CLI harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePayload {
    pub data: Value,
    #[serde(default)]
    pub options: ScoreOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a base64url payload, accepting both padded and unpadded input.
pub fn decode_payload(encoded: &str) -> Result<ScorePayload, PayloadError> {
    let trimmed = encoded.trim();
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| URL_SAFE.decode(trimmed))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encode a payload the way the harness expects it (unpadded base64url).
pub fn encode_payload(payload: &ScorePayload) -> Result<String, PayloadError> {
    let json = serde_json::to_vec(payload)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_data_and_options() {
        let payload = ScorePayload {
            data: json!({"primaryIncome": 5200}),
            options: ScoreOptions {
                ideal_emergency_months: 4.0,
                ..ScoreOptions::default()
            },
        };
        let encoded = encode_payload(&payload).expect("payload encodes");
        let decoded = decode_payload(&encoded).expect("payload decodes");
        assert_eq!(decoded.data, payload.data);
        assert_eq!(decoded.options.ideal_emergency_months, 4.0);
    }

    #[test]
    fn missing_options_default() {
        let encoded = URL_SAFE_NO_PAD.encode(r#"{"data": {}}"#);
        let decoded = decode_payload(&encoded).expect("payload decodes");
        assert_eq!(decoded.options.baseline_monthly_income, 6500.0);
    }

    #[test]
    fn accepts_padded_base64() {
        let padded = URL_SAFE.encode(r#"{"data": {"age": 30}}"#);
        assert!(decode_payload(&padded).is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_payload("!!not-base64!!"),
            Err(PayloadError::Base64(_))
        ));
        let not_json = URL_SAFE_NO_PAD.encode("hello");
        assert!(matches!(
            decode_payload(&not_json),
            Err(PayloadError::Json(_))
        ));
    }
}
