//! Screens mounted by the route table.
//!
//! ARCHITECTURE
//! ============
//! Pages are thin: they gather form input, call one `ApiClient` method, and
//! hand the result to `PayloadView` or a status line. Input validation lives
//! in plain functions so it can be tested without a DOM.


pub mod account;
pub mod admin;
pub mod auth;
pub mod posts;

use crate::net::ApiError;

/// Status-line text for a failed call.
#[must_use]
pub fn failure_text(action: &str, err: &ApiError) -> String {
    format!("{action} failed: {}", err.message())
}

/// Trimmed value, or `message` when blank.
///
/// # Errors
///
/// Returns `message` if `raw` is empty after trimming.
pub fn required<'a>(raw: &str, message: &'a str) -> Result<String, &'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { Err(message) } else { Ok(trimmed.to_owned()) }
}

/// Run `call` in the background and store its outcome in `target`.
#[cfg(feature = "csr")]
pub(crate) fn load_into<F>(target: leptos::prelude::RwSignal<crate::components::payload_view::Fetched>, call: F)
where
    F: std::future::Future<Output = crate::net::ApiResult> + 'static,
{
    use leptos::prelude::Set;

    target.set(None);
    leptos::task::spawn_local(async move {
        target.set(Some(call.await.map_err(|err| err.message())));
    });
}

/// Attach the first file picked in `input` as `field`, if any.
#[cfg(feature = "csr")]
pub(crate) async fn attach_picked_file(
    form: crate::net::request::MultipartForm,
    field: &str,
    input: Option<web_sys::HtmlInputElement>,
) -> Result<crate::net::request::MultipartForm, String> {
    let Some(file) = input.and_then(|el| el.files()).and_then(|files| files.get(0)) else {
        return Ok(form);
    };
    let (file_name, content_type, bytes) = crate::net::browser::read_file(&file).await?;
    Ok(form.file(field, file_name, content_type, bytes))
}
