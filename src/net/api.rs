//! REST client for the postboard backend.
//!
//! Every public method maps to exactly one HTTP call and resolves to either
//! the backend's raw success payload or a normalized [`ApiError`]. There are
//! no retries, no caching, and no request deduplication.
//!
//! ENCODING
//! ========
//! Likes, comments, replies and notification reads are always sent as
//! multipart forms, even though they never carry files. The backend reads
//! those fields from the form, so JSON would silently drop them.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde_json::Value;

use super::config::ApiConfig;
use super::error::{ApiError, RawFailure, normalize_failure, parse_body};
use super::request::{ApiRequest, Method, MultipartForm, RequestBody};
use super::transport::{PageNavigator, Transport};
use super::types::QueryParams;
use crate::router::LOGIN_PATH;

pub type ApiResult = Result<Value, ApiError>;

/// Façade over all backend endpoints.
///
/// Cheap to clone; configuration is immutable after construction.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn PageNavigator>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, transport: Arc<dyn Transport>, navigator: Arc<dyn PageNavigator>) -> Self {
        Self { config, transport, navigator }
    }

    /// Client wired to `fetch` and `window.location`, with the base URL
    /// resolved from the running environment.
    #[cfg(feature = "csr")]
    pub fn browser() -> Self {
        use super::browser::{GlooTransport, WindowNavigator};
        Self::new(ApiConfig::detect(), Arc::new(GlooTransport), Arc::new(WindowNavigator))
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send(&self, method: Method, path: &str, body: RequestBody) -> ApiResult {
        let request = ApiRequest::new(method, self.config.endpoint(path), body);
        log::debug!("api request: {method} {}", request.url);
        let outcome = match self.transport.send(request).await {
            Ok(resp) if resp.is_success() => return Ok(parse_body(&resp.body)),
            Ok(resp) => RawFailure::Response(resp),
            Err(err) => RawFailure::Transport(err),
        };
        let err = normalize_failure(outcome);
        log::warn!("api request failed: {method} {path}: {err}");
        Err(err)
    }

    async fn get(&self, path: &str) -> ApiResult {
        self.send(Method::Get, path, RequestBody::Empty).await
    }

    async fn post_json(&self, path: &str, payload: Value) -> ApiResult {
        self.send(Method::Post, path, RequestBody::Json(payload)).await
    }

    async fn post_form(&self, path: &str, form: MultipartForm) -> ApiResult {
        self.send(Method::Post, path, RequestBody::Multipart(form)).await
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /auth/login` with JSON credentials.
    pub async fn login(&self, payload: Value) -> ApiResult {
        self.post_json("/auth/login", payload).await
    }

    /// `POST /auth/register` with a JSON account payload.
    pub async fn register(&self, payload: Value) -> ApiResult {
        self.post_json("/auth/register", payload).await
    }

    /// `GET /api/auth/pending-email`: the address awaiting verification.
    pub async fn get_pending_email(&self) -> ApiResult {
        self.get("/api/auth/pending-email").await
    }

    /// `POST /api/auth/verify_code`.
    pub async fn verify_email_code(&self, payload: Value) -> ApiResult {
        self.post_json("/api/auth/verify_code", payload).await
    }

    /// End the session, then hard-navigate to the login page.
    ///
    /// The navigation happens whatever the request's outcome, discarding all
    /// client-side state. The request's result is still returned.
    pub async fn logout(&self) -> ApiResult {
        let result = self.get("/auth/logout").await;
        if let Err(err) = &result {
            log::warn!("logout request failed, resetting anyway: {err}");
        }
        self.navigator.hard_navigate(LOGIN_PATH);
        result
    }

    // =========================================================================
    // USER & POSTS
    // =========================================================================

    /// `GET /api/get_user`: identity and role of the current session.
    pub async fn get_current_user(&self) -> ApiResult {
        self.get("/api/get_user").await
    }

    pub async fn get_posts(&self) -> ApiResult {
        self.get("/api/get_posts").await
    }

    pub async fn get_posts_by_category(&self, category: &str) -> ApiResult {
        let path = QueryParams::new()
            .with("category", category)
            .append_to("/api/get_posts_by_category");
        self.get(&path).await
    }

    /// `POST /post_section/create`. The form may carry a media file.
    pub async fn create_post(&self, form: MultipartForm) -> ApiResult {
        self.post_form("/post_section/create", form).await
    }

    pub async fn get_post(&self, id: &str) -> ApiResult {
        self.get(&format!("/api/get_post/{id}")).await
    }

    pub async fn update_post(&self, id: &str, form: MultipartForm) -> ApiResult {
        self.post_form(&format!("/post_section/edit_post/{id}"), form)
            .await
    }

    /// `GET /post_section/delete_post/{id}`. The backend deletes on GET.
    pub async fn delete_post(&self, id: &str) -> ApiResult {
        self.get(&format!("/post_section/delete_post/{id}")).await
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    pub async fn search(&self, query: &str) -> ApiResult {
        let path = QueryParams::new().with("q", query).append_to("/api/search");
        self.get(&path).await
    }

    // =========================================================================
    // LIKES, COMMENTS, REPLIES
    // =========================================================================

    pub async fn toggle_like(&self, post_id: &str) -> ApiResult {
        let form = MultipartForm::new().text("post_id", post_id);
        self.post_form("/api/toggle_like", form).await
    }

    pub async fn add_comment(&self, post_id: &str, content: &str) -> ApiResult {
        let form = MultipartForm::new()
            .text("post_id", post_id)
            .text("content", content);
        self.post_form("/api/add_comment", form).await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> ApiResult {
        let form = MultipartForm::new().text("comment_id", comment_id);
        self.post_form("/api/delete_comment", form).await
    }

    pub async fn add_reply(&self, comment_id: &str, content: &str) -> ApiResult {
        let form = MultipartForm::new()
            .text("comment_id", comment_id)
            .text("content", content);
        self.post_form("/api/add_reply", form).await
    }

    pub async fn delete_reply(&self, reply_id: &str) -> ApiResult {
        let form = MultipartForm::new().text("reply_id", reply_id);
        self.post_form("/api/delete_reply", form).await
    }

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    pub async fn get_notifications(&self) -> ApiResult {
        self.get("/api/get_notifications").await
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> ApiResult {
        let form = MultipartForm::new().text("notification_id", notification_id);
        self.post_form("/api/mark_notification_read", form).await
    }

    // =========================================================================
    // PROFILE
    // =========================================================================

    pub async fn get_profile(&self) -> ApiResult {
        self.get("/users/profile").await
    }

    /// `POST /users/update_profile`. Multipart when a profile image may be
    /// attached, JSON otherwise.
    pub async fn update_profile(&self, payload: impl Into<RequestBody>) -> ApiResult {
        self.send(Method::Post, "/users/update_profile", payload.into())
            .await
    }

    // =========================================================================
    // ADMIN
    // =========================================================================

    pub async fn get_admin_users(&self, params: &QueryParams) -> ApiResult {
        self.get(&params.append_to("/api/admin/users")).await
    }

    pub async fn create_admin_user(&self, payload: Value) -> ApiResult {
        self.post_json("/api/admin/users", payload).await
    }

    pub async fn get_admin_user(&self, id: &str) -> ApiResult {
        self.get(&format!("/api/admin/users/{id}")).await
    }

    pub async fn update_admin_user(&self, id: &str, payload: Value) -> ApiResult {
        self.post_json(&format!("/api/admin/users/{id}"), payload)
            .await
    }

    /// `POST /api/admin/users/{id}/delete` with no body.
    pub async fn delete_admin_user(&self, id: &str) -> ApiResult {
        self.send(Method::Post, &format!("/api/admin/users/{id}/delete"), RequestBody::Empty)
            .await
    }
}
