//! Decoding of palette server response bodies.

use serde_json::Value;
use swatchbox_types::{HistoryPage, PaletteResult, UploadReply};

use crate::PaletteApiError;

/// Parse an upload response body.
///
/// The HTTP status is only used for error context: any JSON body with a
/// non-empty `error` field is a rejection, anything else must match the
/// success shape.
pub fn parse_upload_reply(status: u16, text: &str) -> Result<UploadReply, PaletteApiError> {
    let value: Value = serde_json::from_str(text).map_err(|source| PaletteApiError::InvalidJson { status, source })?;

    if let Some(message) = error_message(&value) {
        return Ok(UploadReply::Rejected(message));
    }

    let result: PaletteResult =
        serde_json::from_value(value).map_err(|error| PaletteApiError::UnexpectedShape(error.to_string()))?;
    Ok(UploadReply::Palette(result))
}

/// Parse the history listing body.
pub fn parse_history_page(status: u16, text: &str) -> Result<HistoryPage, PaletteApiError> {
    serde_json::from_str(text).map_err(|source| PaletteApiError::InvalidJson { status, source })
}

/// Parse the delete endpoint's `{ "success": bool }` body.
pub fn parse_delete_reply(status: u16, text: &str) -> Result<(), PaletteApiError> {
    let value: Value = serde_json::from_str(text).map_err(|source| PaletteApiError::InvalidJson { status, source })?;
    if let Some(message) = error_message(&value) {
        return Err(PaletteApiError::Status { status, body: message });
    }
    match value.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(()),
        _ => Err(PaletteApiError::UnexpectedShape(format!("delete did not report success: {}", value))),
    }
}

/// Extract a truthy `error` field. Empty strings, `false`, `0` and `null` do not count.
fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_BODY: &str = r##"{
        "palette": [
            {"hex": "#ff0000", "rgb": [255, 0, 0], "complement_hex": "#00ffff"},
            {"hex": "#00ff00", "rgb": [0, 255, 0], "complement_hex": "#ff00ff"}
        ],
        "average": {"hex": "#808080"},
        "png_url": "/dl/1.png",
        "json_url": "/dl/1.json"
    }"##;

    #[test]
    fn success_body_keeps_server_order() {
        let reply = parse_upload_reply(200, SUCCESS_BODY).unwrap();
        let UploadReply::Palette(result) = reply else {
            panic!("expected palette reply");
        };
        let hexes: Vec<&str> = result.palette.iter().map(|entry| entry.hex.as_str()).collect();
        assert_eq!(hexes, vec!["#ff0000", "#00ff00"]);
        assert_eq!(result.png_download(), Some("/dl/1.png"));
    }

    #[test]
    fn error_field_short_circuits_even_with_200() {
        let reply = parse_upload_reply(200, r#"{"error": "unsupported format"}"#).unwrap();
        assert_eq!(reply, UploadReply::Rejected("unsupported format".into()));
    }

    #[test]
    fn error_field_on_4xx_is_still_a_rejection() {
        let reply = parse_upload_reply(400, r#"{"error": "No file uploaded"}"#).unwrap();
        assert_eq!(reply, UploadReply::Rejected("No file uploaded".into()));
    }

    #[test]
    fn empty_error_field_is_ignored() {
        let body = r##"{"error": "", "palette": [], "average": {"hex": "#000000"}, "json_url": "/x.json"}"##;
        assert!(matches!(parse_upload_reply(200, body).unwrap(), UploadReply::Palette(_)));
    }

    #[test]
    fn zero_error_field_is_falsy() {
        let body = r##"{"error": 0, "palette": [], "average": {"hex": "#000000"}, "json_url": "/x.json"}"##;
        assert!(matches!(parse_upload_reply(200, body).unwrap(), UploadReply::Palette(_)));

        let reply = parse_upload_reply(500, r#"{"error": 3}"#).unwrap();
        assert_eq!(reply, UploadReply::Rejected("3".into()));
    }

    #[test]
    fn non_json_body_is_transport_error() {
        let error = parse_upload_reply(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(error, PaletteApiError::InvalidJson { status: 502, .. }));
        assert!(error.to_string().contains("HTTP 502"));
    }

    #[test]
    fn missing_json_url_is_unexpected_shape() {
        let body = r##"{"palette": [], "average": {"hex": "#000000"}}"##;
        let error = parse_upload_reply(200, body).unwrap_err();
        assert!(matches!(error, PaletteApiError::UnexpectedShape(_)));
    }

    #[test]
    fn delete_reply_requires_success_flag() {
        assert!(parse_delete_reply(200, r#"{"success": true}"#).is_ok());
        assert!(parse_delete_reply(200, r#"{"success": false}"#).is_err());
        assert!(parse_delete_reply(200, "not json").is_err());
    }
}
