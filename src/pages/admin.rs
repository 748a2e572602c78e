//! Admin member management: list, create and edit users.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use serde_json::{Map, Value};

use super::posts::record_id;
use super::required;
use crate::components::nav_bar::NavBar;
use crate::components::payload_view::{PayloadView, items};
use crate::net::types::AdminUserQuery;

/// Role values the backend accepts.
pub const ROLE_CHOICES: [&str; 2] = ["user", "admin"];

/// JSON body for creating or updating a member.
///
/// A blank password is only allowed on update, where it means "unchanged"
/// and is left out of the payload.
///
/// # Errors
///
/// Returns a user-facing message for blank required fields or an unknown role.
pub fn member_payload(
    username: &str,
    email: &str,
    password: &str,
    role: &str,
    creating: bool,
) -> Result<Value, &'static str> {
    let username = required(username, "Username and email are required.")?;
    let email = required(email, "Username and email are required.")?;
    if !ROLE_CHOICES.contains(&role) {
        return Err("Pick a valid role.");
    }
    let mut body = Map::new();
    body.insert("username".to_owned(), Value::String(username));
    body.insert("email".to_owned(), Value::String(email));
    body.insert("role".to_owned(), Value::String(role.to_owned()));
    match (password.is_empty(), creating) {
        (true, true) => return Err("New members need a password."),
        (true, false) => {}
        (false, _) => {
            body.insert("password".to_owned(), Value::String(password.to_owned()));
        }
    }
    Ok(Value::Object(body))
}

/// Listing filters from the search box, role picker and page number.
#[must_use]
pub fn member_query(search: &str, role: &str, page: u32) -> AdminUserQuery {
    let non_blank = |raw: &str| Some(raw.trim().to_owned()).filter(|v| !v.is_empty());
    AdminUserQuery {
        page: (page > 1).then_some(page),
        search: non_blank(search),
        role: non_blank(role),
    }
}

fn member_label(member: &Value) -> String {
    let field = |key: &str| member.get(key).and_then(Value::as_str).unwrap_or_default();
    match (field("username"), field("email")) {
        ("", email) => email.to_owned(),
        (name, "") => name.to_owned(),
        (name, email) => format!("{name} <{email}>"),
    }
}

#[component]
pub fn MembersPage() -> impl IntoView {
    let members = RwSignal::new(None::<Result<Value, String>>);
    let search = RwSignal::new(String::new());
    let role = RwSignal::new(String::new());
    let page = RwSignal::new(1_u32);
    let info = RwSignal::new(String::new());

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();

    #[cfg(feature = "csr")]
    {
        let client = client.clone();
        Effect::new(move || {
            let params = crate::net::types::QueryParams::from(&member_query(&search.get(), &role.get(), page.get()));
            let client = client.clone();
            super::load_into(members, async move { client.get_admin_users(&params).await });
        });
    }

    let remove = move |id: String| {
        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            leptos::task::spawn_local(async move {
                match client.delete_admin_user(&id).await {
                    Ok(_) => {
                        info.set("Member deleted.".to_owned());
                        let params = crate::net::types::QueryParams::from(&member_query(
                            &search.get_untracked(),
                            &role.get_untracked(),
                            page.get_untracked(),
                        ));
                        super::load_into(members, async move { client.get_admin_users(&params).await });
                    }
                    Err(err) => info.set(super::failure_text("Deleting member", &err)),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        log::trace!("delete member ignored outside the browser: {id}");
    };

    let rows = move || match members.get() {
        Some(Ok(body)) => items(&body, "users"),
        _ => Vec::new(),
    };

    view! {
        <NavBar/>
        <main class="members">
            <h1>"Members"</h1>
            <div class="members__filters">
                <input
                    type="search"
                    placeholder="Search members"
                    prop:value=move || search.get()
                    on:change=move |ev| {
                        search.set(event_target_value(&ev));
                        page.set(1);
                    }
                />
                <select on:change=move |ev| {
                    role.set(event_target_value(&ev));
                    page.set(1);
                }>
                    <option value="">"All roles"</option>
                    {ROLE_CHOICES.iter().map(|r| view! { <option value=*r>{*r}</option> }).collect_view()}
                </select>
                <A href="/admin/members/create">"Add member"</A>
            </div>
            <Show
                when=move || matches!(members.get(), Some(Ok(_)))
                fallback=move || view! { <PayloadView data=members/> }
            >
                <ul>
                    {
                        let remove = remove.clone();
                        move || {
                            rows()
                                .into_iter()
                                .map(|member| {
                                    let label = member_label(&member);
                                    let id = record_id(&member).unwrap_or_default();
                                    let edit = format!("/admin/members/{id}/edit");
                                    let remove = remove.clone();
                                    view! {
                                        <li>
                                            <span>{label}</span>
                                            <A href=edit>"Edit"</A>
                                            <button on:click=move |_| remove(id.clone())>"Delete"</button>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }
                    }
                </ul>
            </Show>
            <div class="members__pager">
                <button
                    disabled=move || page.get() <= 1
                    on:click=move |_| page.update(|p| *p = p.saturating_sub(1).max(1))
                >
                    "Previous"
                </button>
                <span>{move || format!("Page {}", page.get())}</span>
                <button on:click=move |_| page.update(|p| *p += 1)>"Next"</button>
            </div>
            <Show when=move || !info.get().is_empty()>
                <p class="members__info">{move || info.get()}</p>
            </Show>
        </main>
    }
}

/// Username/email/password/role inputs shared by create and edit.
#[component]
fn MemberFields(
    username: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    role: RwSignal<String>,
) -> impl IntoView {
    view! {
        <input
            type="text"
            placeholder="Username"
            prop:value=move || username.get()
            on:input=move |ev| username.set(event_target_value(&ev))
        />
        <input
            type="email"
            placeholder="Email"
            prop:value=move || email.get()
            on:input=move |ev| email.set(event_target_value(&ev))
        />
        <input
            type="password"
            placeholder="Password"
            prop:value=move || password.get()
            on:input=move |ev| password.set(event_target_value(&ev))
        />
        <select prop:value=move || role.get() on:change=move |ev| role.set(event_target_value(&ev))>
            {ROLE_CHOICES.iter().map(|r| view! { <option value=*r>{*r}</option> }).collect_view()}
        </select>
    }
}

#[component]
pub fn MemberCreatePage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(ROLE_CHOICES[0].to_owned());
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
        let payload = match member_payload(&username.get(), &email.get(), &password.get(), &role.get(), true) {
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
                match client.create_admin_user(payload).await {
                    Ok(_) => navigate("/admin/members", leptos_router::NavigateOptions::default()),
                    Err(err) => info.set(super::failure_text("Creating member", &err)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("create member ignored outside the browser: {payload}");
            busy.set(false);
        }
    };

    view! {
        <NavBar/>
        <main class="member-form">
            <h1>"Add member"</h1>
            <form on:submit=on_submit>
                <MemberFields username=username email=email password=password role=role/>
                <button type="submit" disabled=move || busy.get()>"Create"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="member-form__info">{move || info.get()}</p>
            </Show>
        </main>
    }
}

#[component]
pub fn MemberUpdatePage() -> impl IntoView {
    let params = use_params_map();
    let member_id = move || params.get_untracked().get("id").unwrap_or_default();
    let member = RwSignal::new(None::<Result<Value, String>>);
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(ROLE_CHOICES[0].to_owned());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();

    #[cfg(feature = "csr")]
    {
        let client = client.clone();
        let id = member_id();
        leptos::task::spawn_local(async move {
            let result = client.get_admin_user(&id).await;
            if let Ok(body) = &result {
                let user = body.get("user").unwrap_or(body);
                let field = |key: &str| user.get(key).and_then(Value::as_str).unwrap_or_default().to_owned();
                username.set(field("username"));
                email.set(field("email"));
                let current = field("role");
                if ROLE_CHOICES.contains(&current.as_str()) {
                    role.set(current);
                }
            }
            member.set(Some(result.map_err(|err| err.message())));
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let payload = match member_payload(&username.get(), &email.get(), &password.get(), &role.get(), false) {
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
            let id = member_id();
            leptos::task::spawn_local(async move {
                match client.update_admin_user(&id, payload).await {
                    Ok(_) => {
                        password.set(String::new());
                        info.set("Member saved.".to_owned());
                    }
                    Err(err) => info.set(super::failure_text("Saving member", &err)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("update member {} ignored outside the browser: {payload}", member_id());
            busy.set(false);
        }
    };

    view! {
        <NavBar/>
        <main class="member-form">
            <h1>"Edit member"</h1>
            <Show when=move || !matches!(member.get(), Some(Ok(_)))>
                <PayloadView data=member/>
            </Show>
            <form on:submit=on_submit>
                <MemberFields username=username email=email password=password role=role/>
                <button type="submit" disabled=move || busy.get()>"Save"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="member-form__info">{move || info.get()}</p>
            </Show>
        </main>
    }
}
