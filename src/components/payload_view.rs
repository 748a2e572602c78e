//! Generic loading / error / payload display for fetched backend data.

#[cfg(test)]
#[path = "payload_view_test.rs"]
mod payload_view_test;

use leptos::prelude::*;
use serde_json::Value;

/// `None` while loading, then the payload or a display message.
pub type Fetched = Option<Result<Value, String>>;

/// Items of a list payload: the array itself, or the array under `key`.
#[must_use]
pub fn items(payload: &Value, key: &str) -> Vec<Value> {
    match payload {
        Value::Array(list) => list.clone(),
        Value::Object(fields) => fields
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Indented JSON for display.
#[must_use]
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[component]
pub fn PayloadView(data: RwSignal<Fetched>) -> impl IntoView {
    move || match data.get() {
        None => view! { <p class="payload payload--loading">"Loading..."</p> }.into_any(),
        Some(Err(message)) => view! { <p class="payload payload--error">{message}</p> }.into_any(),
        Some(Ok(value)) => view! { <pre class="payload">{pretty(&value)}</pre> }.into_any(),
    }
}
