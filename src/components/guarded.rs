//! Route-level access control and query-preserving redirects.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos routes have no global before-each hook, so every route's view is
//! wrapped in [`Guarded`]. Each path change takes a sequencer ticket, public
//! routes included, and protected routes re-run `RouteGuard` for it. Children
//! render only after an `Allow`. Redirect-only paths mount
//! [`LocationRedirect`], which resolves the current location against the
//! static redirect table.

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::router::routes::meta_for;
use crate::router::{Location, Resolution, resolve};

/// Render `children` only if the guard allows the named route.
#[component]
pub fn Guarded(route: &'static str, children: ChildrenFn) -> impl IntoView {
    let meta = meta_for(route);
    let allowed = RwSignal::new(!meta.is_protected());

    #[cfg(feature = "csr")]
    {
        use leptos_router::NavigateOptions;
        use leptos_router::hooks::{use_location, use_navigate};

        use crate::net::ApiClient;
        use crate::router::{CheckSequencer, RouteGuard};

        let client = expect_context::<ApiClient>();
        let sequencer = expect_context::<CheckSequencer>();
        let navigate = use_navigate();
        let pathname = use_location().pathname;
        Effect::new(move || {
            let path = pathname.get();
            let ticket = sequencer.begin();
            if !meta.is_protected() {
                return;
            }
            let client = client.clone();
            let sequencer = sequencer.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let Some(decision) = RouteGuard::new(client).check_current(meta, &sequencer, ticket).await else {
                    log::debug!("guard check for {route} at {path} was superseded");
                    return;
                };
                match decision.redirect_path() {
                    None => allowed.set(true),
                    Some(target) => navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() }),
                }
            });
        });
    }

    view! {
        <Show when=move || allowed.get()>
            {children()}
        </Show>
    }
}

/// Redirect the current location according to the redirect table.
#[component]
pub fn LocationRedirect() -> impl IntoView {
    let current = use_location();
    let search = current.search.get_untracked();
    let from = Location::new(
        current.pathname.get_untracked(),
        search.strip_prefix('?').unwrap_or(&search),
    );
    match resolve(&from) {
        Resolution::Redirect(to) => {
            log::debug!("redirecting {} -> {}", from.href(), to.href());
            view! { <Redirect path=to.href()/> }.into_any()
        }
        Resolution::Render { .. } | Resolution::NotFound => {
            log::warn!("no redirect registered for {}", from.href());
            view! { <p>"Page not found."</p> }.into_any()
        }
    }
}
