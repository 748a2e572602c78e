//! Top navigation for authenticated pages.

use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NavBar() -> impl IntoView {
    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            leptos::task::spawn_local(async move {
                // The client resets to /login on its own.
                if let Err(err) = client.logout().await {
                    log::info!("logout finished with error: {err}");
                }
            });
        }
    };

    view! {
        <nav class="nav-bar">
            <A href="/home">"Home"</A>
            <A href="/categories">"Categories"</A>
            <A href="/post/create">"New post"</A>
            <A href="/notifications">"Notifications"</A>
            <A href="/profile">"Profile"</A>
            <A href="/admin/members">"Members"</A>
            <form class="nav-bar__search" method="get" action="/search">
                <input type="search" name="q" placeholder="Search posts"/>
            </form>
            <button class="nav-bar__logout" on:click=on_logout>"Log out"</button>
        </nav>
    }
}
