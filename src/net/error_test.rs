use super::*;
use serde_json::json;

fn response(status: u16, status_text: &str, body: &str) -> RawFailure {
    RawFailure::Response(RawResponse {
        status,
        status_text: status_text.to_owned(),
        body: body.to_owned(),
    })
}

// =============================================================
// normalize_failure
// =============================================================

#[test]
fn structured_body_is_surfaced_unaltered() {
    let err = normalize_failure(response(409, "Conflict", r#"{"code":409,"error":"duplicate"}"#));
    assert_eq!(err, ApiError::Backend(json!({ "code": 409, "error": "duplicate" })));
}

#[test]
fn plain_text_body_is_kept_as_string() {
    let err = normalize_failure(response(500, "Internal Server Error", "database down"));
    assert_eq!(err, ApiError::Backend(json!("database down")));
    assert_eq!(err.message(), "database down");
}

#[test]
fn empty_body_falls_back_to_response() {
    let err = normalize_failure(response(502, "Bad Gateway", "   "));
    assert_eq!(err, ApiError::Response { status: 502, status_text: "Bad Gateway".to_owned() });
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.message(), "502 Bad Gateway");
}

#[test]
fn falsy_json_body_falls_back_to_response() {
    for body in ["null", "false", "0", "\"\""] {
        let err = normalize_failure(response(400, "", body));
        assert_eq!(err.status(), Some(400), "body {body}");
    }
}

#[test]
fn empty_object_body_is_still_usable() {
    let err = normalize_failure(response(422, "", "{}"));
    assert_eq!(err, ApiError::Backend(json!({})));
}

#[test]
fn network_failure_without_message_gets_default() {
    let err = normalize_failure(RawFailure::Transport(TransportError::Network(String::new())));
    assert_eq!(err, ApiError::Network { message: DEFAULT_NETWORK_ERROR.to_owned() });
    assert!(!err.message().is_empty());
}

#[test]
fn network_failure_keeps_its_message() {
    let err = normalize_failure(RawFailure::Transport(TransportError::Network("timed out".to_owned())));
    assert_eq!(err.message(), "timed out");
    assert_eq!(err.status(), None);
}

#[test]
fn build_failure_is_reported_as_network_error() {
    let err = normalize_failure(RawFailure::Transport(TransportError::Build("bad header".to_owned())));
    assert_eq!(err.message(), "failed to build request: bad header");
}

// =============================================================
// message / envelope
// =============================================================

#[test]
fn backend_message_prefers_message_then_error() {
    let with_message = ApiError::Backend(json!({ "message": "Invalid code", "error": "x" }));
    assert_eq!(with_message.message(), "Invalid code");
    let with_error = ApiError::Backend(json!({ "error": "duplicate" }));
    assert_eq!(with_error.to_string(), "duplicate");
    let bare = ApiError::Backend(json!({ "code": 1 }));
    assert_eq!(bare.message(), "Request failed");
}

#[test]
fn envelope_keeps_backend_fields_and_adds_message() {
    let err = ApiError::Backend(json!({ "code": 409, "error": "duplicate" }));
    assert_eq!(
        err.to_envelope(),
        json!({ "code": 409, "error": "duplicate", "message": "duplicate" })
    );
}

#[test]
fn envelope_does_not_overwrite_backend_message() {
    let err = ApiError::Backend(json!({ "message": "nope", "field": "email" }));
    assert_eq!(err.to_envelope(), json!({ "message": "nope", "field": "email" }));
}

#[test]
fn envelope_for_response_and_network() {
    let resp = ApiError::Response { status: 404, status_text: String::new() };
    assert_eq!(resp.to_envelope()["status"], json!(404));
    assert_eq!(resp.to_envelope()["message"], json!("request failed with status 404"));
    let net = ApiError::Network { message: "offline".to_owned() };
    assert_eq!(net.to_envelope(), json!({ "message": "offline" }));
}

#[test]
fn parse_body_handles_empty_json_and_text() {
    assert_eq!(parse_body(""), Value::Null);
    assert_eq!(parse_body(r#"{"ok":true}"#), json!({ "ok": true }));
    assert_eq!(parse_body("<html>"), json!("<html>"));
}

#[test]
fn network_failure_message_matches_transport_display() {
    let raw = TransportError::Network("connection reset".to_owned());
    let err = normalize_failure(RawFailure::Transport(raw.clone()));
    assert_eq!(err.message(), raw.to_string());
}
