use super::*;
use crate::net::request::{APPLICATION_JSON, CONTENT_TYPE};
use crate::net::testing::{TEST_BASE_URL, client};
use crate::net::transport::{RawResponse, TransportError};
use futures::executor::block_on;
use serde_json::json;

fn url(path: &str) -> String {
    format!("{TEST_BASE_URL}{path}")
}

// =============================================================
// Success and failure shapes
// =============================================================

#[test]
fn success_returns_raw_payload() {
    let (api, transport, _) = client();
    transport.push_json(200, json!({ "posts": [{ "id": 1 }] }));
    let body = block_on(api.get_posts()).unwrap();
    assert_eq!(body, json!({ "posts": [{ "id": 1 }] }));
    let req = transport.last();
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.url, url("/api/get_posts"));
}

#[test]
fn any_2xx_is_success() {
    let (api, transport, _) = client();
    transport.push(Ok(RawResponse::new(204, "")));
    assert_eq!(block_on(api.get_notifications()).unwrap(), Value::Null);
}

#[test]
fn backend_error_body_is_rejected_unaltered() {
    let (api, transport, _) = client();
    transport.push_json(409, json!({ "code": 409, "error": "duplicate" }));
    let err = block_on(api.register(json!({ "email": "a@b.com" }))).unwrap_err();
    assert_eq!(err, ApiError::Backend(json!({ "code": 409, "error": "duplicate" })));
}

#[test]
fn error_status_without_body_rejects_with_response() {
    let (api, transport, _) = client();
    transport.push(Ok(RawResponse { status: 500, status_text: "Internal Server Error".to_owned(), body: String::new() }));
    let err = block_on(api.get_profile()).unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[test]
fn network_failure_without_message_rejects_with_default() {
    let (api, transport, _) = client();
    transport.push(Err(TransportError::Network(String::new())));
    let err = block_on(api.get_post("5")).unwrap_err();
    assert_eq!(err, ApiError::Network { message: "Network error".to_owned() });
}

#[test]
fn no_operation_retries() {
    let (api, transport, _) = client();
    transport.push(Err(TransportError::Network("offline".to_owned())));
    assert!(block_on(api.search("x")).is_err());
    assert_eq!(transport.requests().len(), 1);
}

// =============================================================
// Encoding
// =============================================================

#[test]
fn json_operations_send_json_content_type() {
    let (api, transport, _) = client();
    let payload = json!({ "email": "a@b.com", "password": "pw" });
    block_on(api.login(payload.clone())).unwrap();
    let req = transport.last();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, url("/auth/login"));
    assert_eq!(req.header(CONTENT_TYPE), Some(APPLICATION_JSON));
    assert_eq!(req.body, RequestBody::Json(payload));
    assert!(req.with_credentials);
}

#[test]
fn create_post_sends_multipart_without_content_type() {
    let (api, transport, _) = client();
    let form = MultipartForm::new()
        .text("title", "Hello")
        .file("media", "a.png", "image/png", vec![0x89, 0x50]);
    block_on(api.create_post(form.clone())).unwrap();
    let req = transport.last();
    assert_eq!(req.url, url("/post_section/create"));
    assert!(req.header(CONTENT_TYPE).is_none());
    assert_eq!(req.body, RequestBody::Multipart(form));
}

#[test]
fn interaction_endpoints_always_use_multipart() {
    let (api, transport, _) = client();
    block_on(api.toggle_like("1")).unwrap();
    block_on(api.add_comment("1", "nice")).unwrap();
    block_on(api.delete_comment("2")).unwrap();
    block_on(api.add_reply("2", "thanks")).unwrap();
    block_on(api.delete_reply("3")).unwrap();
    block_on(api.mark_notification_read("4")).unwrap();

    let expected = [
        ("/api/toggle_like", MultipartForm::new().text("post_id", "1")),
        ("/api/add_comment", MultipartForm::new().text("post_id", "1").text("content", "nice")),
        ("/api/delete_comment", MultipartForm::new().text("comment_id", "2")),
        ("/api/add_reply", MultipartForm::new().text("comment_id", "2").text("content", "thanks")),
        ("/api/delete_reply", MultipartForm::new().text("reply_id", "3")),
        ("/api/mark_notification_read", MultipartForm::new().text("notification_id", "4")),
    ];
    let requests = transport.requests();
    assert_eq!(requests.len(), expected.len());
    for (req, (path, form)) in requests.iter().zip(expected) {
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, url(path));
        assert!(req.header(CONTENT_TYPE).is_none(), "{path} must not set Content-Type");
        assert_eq!(req.body, RequestBody::Multipart(form));
    }
}

#[test]
fn update_profile_accepts_either_encoding() {
    let (api, transport, _) = client();
    block_on(api.update_profile(MultipartForm::new().text("username", "jo"))).unwrap();
    assert!(transport.last().header(CONTENT_TYPE).is_none());
    block_on(api.update_profile(json!({ "username": "jo" }))).unwrap();
    assert_eq!(transport.last().header(CONTENT_TYPE), Some(APPLICATION_JSON));
    assert_eq!(transport.last().url, url("/users/update_profile"));
}

// =============================================================
// Paths
// =============================================================

#[test]
fn get_endpoints_match_backend_paths() {
    let (api, transport, _) = client();
    block_on(api.get_pending_email()).unwrap();
    block_on(api.get_current_user()).unwrap();
    block_on(api.get_post("12")).unwrap();
    block_on(api.delete_post("12")).unwrap();
    block_on(api.get_profile()).unwrap();
    block_on(api.get_admin_user("9")).unwrap();

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        [
            url("/api/auth/pending-email"),
            url("/api/get_user"),
            url("/api/get_post/12"),
            url("/post_section/delete_post/12"),
            url("/users/profile"),
            url("/api/admin/users/9"),
        ]
    );
    assert!(transport.requests().iter().all(|r| r.method == Method::Get && r.body == RequestBody::Empty));
}

#[test]
fn query_endpoints_encode_parameters() {
    let (api, transport, _) = client();
    block_on(api.get_posts_by_category("Arts & Crafts")).unwrap();
    assert_eq!(transport.last().url, url("/api/get_posts_by_category?category=Arts+%26+Crafts"));
    block_on(api.search("rust lang")).unwrap();
    assert_eq!(transport.last().url, url("/api/search?q=rust+lang"));
    block_on(api.get_admin_users(&QueryParams::new().with("page", 2))).unwrap();
    assert_eq!(transport.last().url, url("/api/admin/users?page=2"));
    block_on(api.get_admin_users(&QueryParams::new())).unwrap();
    assert_eq!(transport.last().url, url("/api/admin/users"));
}

#[test]
fn update_post_targets_edit_path() {
    let (api, transport, _) = client();
    block_on(api.update_post("8", MultipartForm::new().text("title", "t"))).unwrap();
    let req = transport.last();
    assert_eq!(req.url, url("/post_section/edit_post/8"));
    assert!(req.body.is_multipart());
}

#[test]
fn admin_writes_use_json_and_post() {
    let (api, transport, _) = client();
    block_on(api.create_admin_user(json!({ "username": "a" }))).unwrap();
    block_on(api.update_admin_user("3", json!({ "role": "admin" }))).unwrap();
    block_on(api.verify_email_code(json!({ "code": "123456" }))).unwrap();
    let requests = transport.requests();
    assert_eq!(requests[0].url, url("/api/admin/users"));
    assert_eq!(requests[1].url, url("/api/admin/users/3"));
    assert_eq!(requests[2].url, url("/api/auth/verify_code"));
    assert!(requests.iter().all(|r| r.method == Method::Post && r.header(CONTENT_TYPE) == Some(APPLICATION_JSON)));
}

#[test]
fn delete_admin_user_posts_without_body() {
    let (api, transport, _) = client();
    block_on(api.delete_admin_user("3")).unwrap();
    let req = transport.last();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, url("/api/admin/users/3/delete"));
    assert_eq!(req.body, RequestBody::Empty);
}

// =============================================================
// Logout
// =============================================================

#[test]
fn logout_calls_backend_then_resets_to_login() {
    let (api, transport, navigator) = client();
    block_on(api.logout()).unwrap();
    assert_eq!(transport.last().url, url("/auth/logout"));
    assert_eq!(transport.last().method, Method::Get);
    assert_eq!(navigator.visits(), ["/login"]);
}

#[test]
fn logout_resets_even_when_the_call_fails() {
    let (api, transport, navigator) = client();
    transport.push(Err(TransportError::Network(String::new())));
    assert!(block_on(api.logout()).is_err());
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(navigator.visits(), ["/login"]);
}

#[test]
fn logout_resets_on_backend_rejection() {
    let (api, transport, navigator) = client();
    transport.push_json(401, json!({ "error": "not logged in" }));
    assert!(block_on(api.logout()).is_err());
    assert_eq!(navigator.visits(), ["/login"]);
}

#[test]
fn other_operations_never_navigate() {
    let (api, transport, navigator) = client();
    transport.push_json(401, json!({ "error": "unauthorized" }));
    assert!(block_on(api.get_notifications()).is_err());
    assert!(navigator.visits().is_empty());
}
