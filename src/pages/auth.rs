//! Login, registration and email verification pages.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::components::A;
use serde_json::{Value, json};

use super::required;

/// JSON body for `POST /auth/login`.
///
/// # Errors
///
/// Returns a user-facing message if either field is blank.
pub fn login_payload(email: &str, password: &str) -> Result<Value, &'static str> {
    let email = required(email, "Enter your email and password.")?;
    if password.is_empty() {
        return Err("Enter your email and password.");
    }
    Ok(json!({ "email": email, "password": password }))
}

/// JSON body for `POST /auth/register`.
///
/// # Errors
///
/// Returns a user-facing message if a field is blank or the passwords differ.
pub fn register_payload(username: &str, email: &str, password: &str, confirm: &str) -> Result<Value, &'static str> {
    let username = required(username, "All fields are required.")?;
    let email = required(email, "All fields are required.")?;
    if password.is_empty() {
        return Err("All fields are required.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(json!({ "username": username, "email": email, "password": password }))
}

/// JSON body for `POST /api/auth/verify_code`.
///
/// # Errors
///
/// Returns a user-facing message unless `code` is six ASCII digits.
pub fn verify_payload(email: &str, code: &str) -> Result<Value, &'static str> {
    let code = code.trim();
    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Enter the 6-digit code from your email.");
    }
    Ok(json!({ "email": email.trim(), "code": code }))
}

/// Treat a 2xx body with `"success": false` as a failure.
///
/// # Errors
///
/// Returns the backend's `message` (or `error`) when `success` is false.
pub fn check_success(body: &Value) -> Result<(), String> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .unwrap_or("Request was rejected.");
        return Err(message.to_owned());
    }
    Ok(())
}

/// Pending address from `GET /api/auth/pending-email`.
#[must_use]
pub fn pending_email(body: &Value) -> Option<String> {
    body.get("email")
        .or_else(|| body.get("pending_email"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();
    #[cfg(feature = "csr")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let payload = match login_payload(&email.get(), &password.get()) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let outcome = match client.login(payload).await {
                    Ok(body) => check_success(&body),
                    Err(err) => Err(super::failure_text("Login", &err)),
                };
                match outcome {
                    Ok(()) => navigate(crate::router::HOME_PATH, leptos_router::NavigateOptions::default()),
                    Err(message) => info.set(message),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("login submit ignored outside the browser: {payload}");
            busy.set(false);
        }
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Sign in"</h1>
                <input
                    type="email"
                    placeholder="you@example.com"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || busy.get()>"Sign in"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <A href="/register">"Create an account"</A>
            </form>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();
    #[cfg(feature = "csr")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let payload = match register_payload(&username.get(), &email.get(), &password.get(), &confirm.get()) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let outcome = match client.register(payload).await {
                    Ok(body) => check_success(&body),
                    Err(err) => Err(super::failure_text("Registration", &err)),
                };
                match outcome {
                    Ok(()) => navigate("/verify", leptos_router::NavigateOptions::default()),
                    Err(message) => info.set(message),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("register submit ignored outside the browser: {payload}");
            busy.set(false);
        }
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Create an account"</h1>
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <input
                    type="email"
                    placeholder="you@example.com"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Confirm password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| confirm.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || busy.get()>"Register"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <A href="/login">"Already registered? Sign in"</A>
            </form>
        </div>
    }
}

#[component]
pub fn VerifyPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let code = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();
    #[cfg(feature = "csr")]
    let navigate = leptos_router::hooks::use_navigate();

    #[cfg(feature = "csr")]
    {
        let client = client.clone();
        leptos::task::spawn_local(async move {
            match client.get_pending_email().await {
                Ok(body) => {
                    if let Some(address) = pending_email(&body) {
                        email.set(address);
                    }
                }
                Err(err) => info.set(super::failure_text("Loading pending email", &err)),
            }
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let payload = match verify_payload(&email.get(), &code.get()) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let outcome = match client.verify_email_code(payload).await {
                    Ok(body) => check_success(&body),
                    Err(err) => Err(super::failure_text("Verification", &err)),
                };
                match outcome {
                    Ok(()) => navigate(crate::router::LOGIN_PATH, leptos_router::NavigateOptions::default()),
                    Err(message) => info.set(message),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("verify submit ignored outside the browser: {payload}");
            busy.set(false);
        }
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Verify your email"</h1>
                <p class="auth-card__subtitle">
                    {move || {
                        let address = email.get();
                        if address.is_empty() {
                            "Enter the code we sent you.".to_owned()
                        } else {
                            format!("Enter the code sent to {address}.")
                        }
                    }}
                </p>
                <input
                    type="text"
                    inputmode="numeric"
                    maxlength="6"
                    placeholder="123456"
                    prop:value=move || code.get()
                    on:input=move |ev| code.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || busy.get()>"Verify"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
            </form>
        </div>
    }
}
