//! Notifications and profile pages.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use leptos::prelude::*;
use serde_json::Value;

use super::posts::record_id;
use super::required;
use crate::components::nav_bar::NavBar;
use crate::components::payload_view::{PayloadView, items};
use crate::net::request::MultipartForm;
use crate::util::fonts;

/// Font stacks offered on the profile page.
pub const FONT_CHOICES: [&str; 6] = [
    fonts::DEFAULT_FONT,
    "Georgia, serif",
    "Roboto, sans-serif",
    "Open Sans, sans-serif",
    "Lato, sans-serif",
    "Merriweather, serif",
];

/// Display text of a notification.
#[must_use]
pub fn notification_text(notification: &Value) -> String {
    ["message", "content", "text"]
        .iter()
        .find_map(|key| notification.get(*key).and_then(Value::as_str))
        .unwrap_or("(no details)")
        .to_owned()
}

/// Whether a notification still needs to be marked read.
///
/// Accepts `read`/`is_read` as booleans or 0/1 integers; missing means unread.
#[must_use]
pub fn is_unread(notification: &Value) -> bool {
    let flag = notification.get("is_read").or_else(|| notification.get("read"));
    match flag {
        Some(Value::Bool(read)) => !read,
        Some(Value::Number(read)) => read.as_i64() == Some(0),
        _ => true,
    }
}

/// Display text plus the id to mark read, present only while unread.
#[must_use]
pub fn notification_entry(notification: &Value) -> (String, Option<String>) {
    let id = record_id(notification).filter(|_| is_unread(notification));
    (notification_text(notification), id)
}

/// Text fields of the profile form.
///
/// # Errors
///
/// Returns a user-facing message if the username is blank.
pub fn profile_form(username: &str, bio: &str) -> Result<MultipartForm, &'static str> {
    let username = required(username, "Username cannot be empty.")?;
    Ok(MultipartForm::new()
        .text("username", username)
        .text("bio", bio.trim()))
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let notifications = RwSignal::new(None::<Result<Value, String>>);
    let info = RwSignal::new(String::new());

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();

    #[cfg(feature = "csr")]
    {
        let client = client.clone();
        super::load_into(notifications, async move { client.get_notifications().await });
    }

    let mark_read = move |id: String| {
        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            leptos::task::spawn_local(async move {
                match client.mark_notification_read(&id).await {
                    Ok(_) => {
                        info.set("Marked as read.".to_owned());
                        super::load_into(notifications, async move { client.get_notifications().await });
                    }
                    Err(err) => info.set(super::failure_text("Marking notification", &err)),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        log::trace!("mark read ignored outside the browser: {id}");
    };

    let entries = move || match notifications.get() {
        Some(Ok(body)) => items(&body, "notifications"),
        _ => Vec::new(),
    };

    view! {
        <NavBar/>
        <main class="notifications">
            <h1>"Notifications"</h1>
            <Show
                when=move || matches!(notifications.get(), Some(Ok(_)))
                fallback=move || view! { <PayloadView data=notifications/> }
            >
                <ul>
                    {
                        let mark_read = mark_read.clone();
                        move || {
                            entries()
                                .into_iter()
                                .map(|notification| {
                                    let (text, id) = notification_entry(&notification);
                                    let unread = id.is_some();
                                    let mark_read = mark_read.clone();
                                    view! {
                                        <li class:notification--unread=unread>
                                            <span>{text}</span>
                                            {id.map(|id| {
                                                view! {
                                                    <button on:click=move |_| mark_read(id.clone())>"Mark read"</button>
                                                }
                                            })}
                                        </li>
                                    }
                                })
                                .collect_view()
                        }
                    }
                </ul>
            </Show>
            <Show when=move || !info.get().is_empty()>
                <p class="notifications__info">{move || info.get()}</p>
            </Show>
        </main>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let profile = RwSignal::new(None::<Result<Value, String>>);
    let username = RwSignal::new(String::new());
    let bio = RwSignal::new(String::new());
    let font = RwSignal::new(fonts::font_preference());
    let image = NodeRef::<leptos::html::Input>::new();
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();

    #[cfg(feature = "csr")]
    {
        let client = client.clone();
        leptos::task::spawn_local(async move {
            let result = client.get_profile().await;
            if let Ok(body) = &result {
                let user = body.get("user").unwrap_or(body);
                let field = |key: &str| user.get(key).and_then(Value::as_str).unwrap_or_default().to_owned();
                username.set(field("username"));
                bio.set(field("bio"));
            }
            profile.set(Some(result.map_err(|err| err.message())));
        });
    }

    let on_font = move |ev: leptos::ev::Event| {
        let choice = event_target_value(&ev);
        fonts::use_font(&choice);
        font.set(choice);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match profile_form(&username.get(), &bio.get()) {
            Ok(form) => form,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            let picked = image.get_untracked();
            leptos::task::spawn_local(async move {
                let outcome = match super::attach_picked_file(form, "profile_image", picked).await {
                    Ok(form) => client
                        .update_profile(form)
                        .await
                        .map_err(|err| super::failure_text("Profile update", &err)),
                    Err(message) => Err(message),
                };
                match outcome {
                    Ok(_) => info.set("Profile saved.".to_owned()),
                    Err(message) => info.set(message),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("profile update ignored outside the browser: {} parts", form.parts().len());
            busy.set(false);
        }
    };

    view! {
        <NavBar/>
        <main class="profile">
            <h1>"Your profile"</h1>
            <Show when=move || !matches!(profile.get(), Some(Ok(_)))>
                <PayloadView data=profile/>
            </Show>
            <form on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="Tell people about yourself"
                    prop:value=move || bio.get()
                    on:input=move |ev| bio.set(event_target_value(&ev))
                ></textarea>
                <input type="file" accept="image/*" node_ref=image/>
                <button type="submit" disabled=move || busy.get()>"Save profile"</button>
            </form>
            <label class="profile__font">
                "Font"
                <select on:change=on_font prop:value=move || font.get()>
                    {FONT_CHOICES
                        .iter()
                        .map(|stack| {
                            view! { <option value=*stack>{fonts::primary_family(stack).to_owned()}</option> }
                        })
                        .collect_view()}
                </select>
            </label>
            <Show when=move || !info.get().is_empty()>
                <p class="profile__info">{move || info.get()}</p>
            </Show>
        </main>
    }
}
