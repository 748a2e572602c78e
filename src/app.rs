//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::guarded::{Guarded, LocationRedirect};
use crate::pages::{
    account::{NotificationsPage, ProfilePage},
    admin::{MemberCreatePage, MemberUpdatePage, MembersPage},
    auth::{LoginPage, RegisterPage, VerifyPage},
    posts::{CategoriesPage, CreatePostPage, EditPostPage, UserPage},
};
use crate::router::routes::{View, route_by_name};
use crate::util::fonts;

fn page(view: View) -> AnyView {
    match view {
        View::Login => view! { <LoginPage/> }.into_any(),
        View::Register => view! { <RegisterPage/> }.into_any(),
        View::Verify => view! { <VerifyPage/> }.into_any(),
        View::UserPage => view! { <UserPage/> }.into_any(),
        View::CreatePost => view! { <CreatePostPage/> }.into_any(),
        View::EditPost => view! { <EditPostPage/> }.into_any(),
        View::Categories => view! { <CategoriesPage/> }.into_any(),
        View::Notifications => view! { <NotificationsPage/> }.into_any(),
        View::Profile => view! { <ProfilePage/> }.into_any(),
        View::Members => view! { <MembersPage/> }.into_any(),
        View::MemberCreate => view! { <MemberCreatePage/> }.into_any(),
        View::MemberUpdate => view! { <MemberUpdatePage/> }.into_any(),
    }
}

/// The page registered under `name`, mounted behind the guard.
fn routed(name: &'static str) -> AnyView {
    let Some(route) = route_by_name(name) else {
        log::error!("route {name:?} is not in the route table");
        return view! { <p>"Page not found."</p> }.into_any();
    };
    let target = route.view;
    view! {
        <Guarded route=name>
            {move || page(target)}
        </Guarded>
    }
    .into_any()
}

/// Root application component.
///
/// Provides the API client and guard sequencer, applies the saved font, and
/// declares the route table.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    #[cfg(feature = "csr")]
    {
        provide_context(crate::net::ApiClient::browser());
        provide_context(crate::router::CheckSequencer::new());
    }

    let font = fonts::font_preference();
    fonts::load_fonts(&[font.as_str()]);
    fonts::apply_font(&font);

    view! {
        <Title text="Postboard"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=LocationRedirect/>
                <Route path=StaticSegment("search") view=LocationRedirect/>
                <Route path=StaticSegment("login") view=|| routed("Login")/>
                <Route path=StaticSegment("register") view=|| routed("Register")/>
                <Route path=StaticSegment("verify") view=|| routed("Verify")/>
                <Route path=StaticSegment("home") view=|| routed("UserPage")/>
                <Route path=(StaticSegment("post"), StaticSegment("create")) view=|| routed("CreatePost")/>
                <Route
                    path=(StaticSegment("post"), StaticSegment("edit"), ParamSegment("id"))
                    view=|| routed("EditPost")
                />
                <Route path=StaticSegment("categories") view=|| routed("Categories")/>
                <Route
                    path=(StaticSegment("categories"), ParamSegment("category"))
                    view=|| routed("CategoryFiltered")
                />
                <Route path=StaticSegment("notifications") view=|| routed("Notifications")/>
                <Route path=StaticSegment("profile") view=|| routed("Profile")/>
                <Route path=(StaticSegment("admin"), StaticSegment("members")) view=|| routed("Members")/>
                <Route
                    path=(StaticSegment("admin"), StaticSegment("members"), StaticSegment("create"))
                    view=|| routed("MemberCreate")
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("members"), ParamSegment("id"), StaticSegment("edit"))
                    view=|| routed("MemberUpdate")
                />
            </Routes>
        </Router>
    }
}
