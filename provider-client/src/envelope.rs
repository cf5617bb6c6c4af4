//! Provider response normalization.
//!
//! Every provider operation answers with the same JSON dialect:
//! `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
//! This module folds raw transport output (including failures, truncated
//! payloads, and garbage) into one typed result.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::transport::TransportError;

/// Why a provider payload could not be turned into typed data.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The transport itself failed (spawn error, non-2xx, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// The payload was empty, not JSON, or not the expected shape.
    #[error("malformed provider payload: {0}")]
    Malformed(String),
    /// The provider answered the envelope dialect with `success: false`;
    /// its error message is preserved unchanged.
    #[error("{0}")]
    Reported(String),
}

/// The provider's wire envelope, before the `data` payload is typed.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Normalize raw transport output into the operation's expected data shape.
pub fn normalize<T: DeserializeOwned>(
    raw: Result<Vec<u8>, TransportError>,
) -> Result<T, ProviderError> {
    let bytes = raw?;

    let envelope: RawEnvelope = serde_json::from_slice(&bytes)
        .map_err(|e| ProviderError::Malformed(format!("invalid envelope: {e}")))?;

    if !envelope.success {
        return Err(ProviderError::Reported(
            envelope.error.unwrap_or_else(|| "unknown provider error".to_string()),
        ));
    }

    let data = envelope
        .data
        .ok_or_else(|| ProviderError::Malformed("success envelope without data".to_string()))?;

    serde_json::from_value(data)
        .map_err(|e| ProviderError::Malformed(format!("unexpected data shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flight;

    fn flight_json() -> serde_json::Value {
        serde_json::json!({
            "id": "3910c71c",
            "callsign": "TAM3344",
            "latitude": -23.43,
            "longitude": -46.47,
            "heading": 182,
            "altitude": 35000,
            "ground_speed": 447,
            "airline": "LA",
            "aircraft": "A320",
            "origin": "GRU",
            "destination": "EZE"
        })
    }

    #[test]
    fn normalize_success_payload() {
        let body = serde_json::json!({"success": true, "data": [flight_json()]});
        let flights: Vec<Flight> = normalize(Ok(body.to_string().into_bytes())).unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].id, "3910c71c");
    }

    #[test]
    fn normalize_transport_failure() {
        let err: Result<Vec<Flight>, _> = normalize(Err(TransportError::Timeout(
            std::time::Duration::from_secs(30),
        )));
        assert!(matches!(err, Err(ProviderError::Transport(_))));
    }

    #[test]
    fn normalize_empty_payload_is_malformed() {
        let err: Result<Vec<Flight>, _> = normalize(Ok(Vec::new()));
        assert!(matches!(err, Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn normalize_truncated_json_is_malformed() {
        let err: Result<Vec<Flight>, _> = normalize(Ok(br#"{"success": true, "da"#.to_vec()));
        assert!(matches!(err, Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn normalize_passes_reported_error_through_unchanged() {
        let body = serde_json::json!({"success": false, "error": "Flight not found"});
        let err: Result<Vec<Flight>, _> = normalize(Ok(body.to_string().into_bytes()));
        match err {
            Err(ProviderError::Reported(msg)) => assert_eq!(msg, "Flight not found"),
            other => panic!("expected reported error, got {other:?}"),
        }
    }

    #[test]
    fn normalize_success_without_data_is_malformed() {
        let body = serde_json::json!({"success": true});
        let err: Result<Vec<Flight>, _> = normalize(Ok(body.to_string().into_bytes()));
        assert!(matches!(err, Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn normalize_wrong_data_shape_is_malformed() {
        let body = serde_json::json!({"success": true, "data": {"not": "a list"}});
        let err: Result<Vec<Flight>, _> = normalize(Ok(body.to_string().into_bytes()));
        assert!(matches!(err, Err(ProviderError::Malformed(_))));
    }
}
