//! API-level response validation
//!
//! Matomo answers most failures with HTTP 200 and a body of the form
//! `{"result": "error", "message": "..."}`. Transport status checks have
//! already run by the time a body reaches this module.

use crate::error::{Error, Result};
use serde_json::Value;
use tracing::debug;

/// Check a raw response body for API-level error signalling
///
/// Returns the parsed payload so callers do not parse the body twice.
/// Bodies that are not JSON yield `None` untouched; the record extractor
/// reports them when it parses the page.
pub fn validate_response(body: &str) -> Result<Option<Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => {
            check_payload(&payload)?;
            Ok(Some(payload))
        }
        Err(e) => {
            debug!("Skipping API error check for non-JSON body: {e}");
            Ok(None)
        }
    }
}

/// Check an already parsed payload for `{"result": "error"}`
pub fn check_payload(payload: &Value) -> Result<()> {
    let Some(map) = payload.as_object() else {
        return Ok(());
    };

    if map.get("result").and_then(Value::as_str) == Some("error") {
        let message = map.get("message").and_then(Value::as_str);
        return Err(Error::api(message));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DEFAULT_API_ERROR_MESSAGE;
    use serde_json::json;

    #[test]
    fn test_error_with_message() {
        let err = validate_response(r#"{"result": "error", "message": "bad token"}"#).unwrap_err();
        assert!(err.is_api_error());
        assert!(err.to_string().contains("bad token"));
    }

    #[test]
    fn test_error_without_message_uses_default() {
        let err = validate_response(r#"{"result": "error"}"#).unwrap_err();
        match err {
            Error::Api { message } => {
                assert!(!message.is_empty());
                assert_eq!(message, DEFAULT_API_ERROR_MESSAGE);
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_string_message_uses_default() {
        let err = check_payload(&json!({"result": "error", "message": 42})).unwrap_err();
        assert!(err.to_string().contains(DEFAULT_API_ERROR_MESSAGE));
    }

    #[test]
    fn test_success_payloads_pass() {
        let payload = validate_response(r#"[{"idSite": 1, "idVisit": 100}]"#).unwrap();
        assert_eq!(payload, Some(json!([{"idSite": 1, "idVisit": 100}])));

        assert_eq!(validate_response("[]").unwrap(), Some(json!([])));
        assert!(validate_response(r#"{"nb_visits": 12, "result": "success"}"#)
            .unwrap()
            .is_some());
        assert!(validate_response(r#"{"result": {"value": "error"}}"#)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_error_inside_array_is_not_api_error() {
        check_payload(&json!([{"result": "error", "message": "row level"}])).unwrap();
    }

    #[test]
    fn test_non_json_body_passes_through() {
        assert_eq!(validate_response("<html>Maintenance</html>").unwrap(), None);
        assert_eq!(validate_response("").unwrap(), None);
    }
}
