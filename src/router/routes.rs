//! Static route table and location resolution.
//!
//! The table below is the user-facing URL contract; paths and names must not
//! change. `resolve` matches a location against it the way the Leptos router
//! in `app` does, so the guard and redirects can be tested without a DOM.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use super::{HOME_PATH, LOGIN_PATH};

/// Access requirements attached to a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self { requires_auth: false, requires_admin: false };
    pub const AUTH: Self = Self { requires_auth: true, requires_admin: false };
    pub const ADMIN: Self = Self { requires_auth: true, requires_admin: true };

    /// Whether the guard has to ask the backend before letting anyone in.
    #[must_use]
    pub fn is_protected(self) -> bool {
        self.requires_auth || self.requires_admin
    }
}

/// Page rendered by a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Verify,
    UserPage,
    CreatePost,
    EditPost,
    Categories,
    Notifications,
    Profile,
    Members,
    MemberCreate,
    MemberUpdate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Path pattern; `:name` segments are dynamic.
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub meta: RouteMeta,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectRule {
    /// Always go to this path; the query is dropped.
    Fixed(&'static str),
    /// Go to this path, carrying the original query string over unchanged.
    KeepQuery(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedirectDescriptor {
    pub path: &'static str,
    pub rule: RedirectRule,
}

pub const REDIRECTS: &[RedirectDescriptor] = &[
    RedirectDescriptor { path: "/", rule: RedirectRule::Fixed(LOGIN_PATH) },
    RedirectDescriptor { path: "/search", rule: RedirectRule::KeepQuery(HOME_PATH) },
];

pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor { path: "/login", name: "Login", view: View::Login, meta: RouteMeta::PUBLIC },
    RouteDescriptor { path: "/register", name: "Register", view: View::Register, meta: RouteMeta::PUBLIC },
    RouteDescriptor { path: "/verify", name: "Verify", view: View::Verify, meta: RouteMeta::PUBLIC },
    RouteDescriptor { path: "/home", name: "UserPage", view: View::UserPage, meta: RouteMeta::AUTH },
    RouteDescriptor { path: "/post/create", name: "CreatePost", view: View::CreatePost, meta: RouteMeta::AUTH },
    RouteDescriptor { path: "/post/edit/:id", name: "EditPost", view: View::EditPost, meta: RouteMeta::AUTH },
    RouteDescriptor { path: "/categories", name: "Categories", view: View::Categories, meta: RouteMeta::AUTH },
    RouteDescriptor {
        path: "/categories/:category",
        name: "CategoryFiltered",
        view: View::UserPage,
        meta: RouteMeta::AUTH,
    },
    RouteDescriptor {
        path: "/notifications",
        name: "Notifications",
        view: View::Notifications,
        meta: RouteMeta::AUTH,
    },
    RouteDescriptor { path: "/profile", name: "Profile", view: View::Profile, meta: RouteMeta::AUTH },
    RouteDescriptor { path: "/admin/members", name: "Members", view: View::Members, meta: RouteMeta::ADMIN },
    RouteDescriptor {
        path: "/admin/members/create",
        name: "MemberCreate",
        view: View::MemberCreate,
        meta: RouteMeta::ADMIN,
    },
    RouteDescriptor {
        path: "/admin/members/:id/edit",
        name: "MemberUpdate",
        view: View::MemberUpdate,
        meta: RouteMeta::ADMIN,
    },
];

/// Look a route up by its name.
#[must_use]
pub fn route_by_name(name: &str) -> Option<&'static RouteDescriptor> {
    ROUTES.iter().find(|route| route.name == name)
}

/// Access requirements for a named route. Unknown names are treated as
/// requiring authentication.
#[must_use]
pub fn meta_for(name: &str) -> RouteMeta {
    route_by_name(name).map_or_else(
        || {
            log::warn!("unknown route name {name:?}; requiring auth");
            RouteMeta::AUTH
        },
        |route| route.meta,
    )
}

/// A path plus its raw query string (without the leading `?`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self { path: path.into(), query: query.into() }
    }

    /// Split an href such as `/search?q=x#top` into path and query.
    /// The fragment is dropped.
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let without_fragment = href.split_once('#').map_or(href, |(head, _)| head);
        match without_fragment.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(without_fragment, ""),
        }
    }

    #[must_use]
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// What the router does with a location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render {
        route: &'static RouteDescriptor,
        params: Vec<(&'static str, String)>,
    },
    Redirect(Location),
    NotFound,
}

/// Match `location` against the redirect and route tables.
///
/// Redirects are checked first, then static routes, then dynamic ones, so a
/// literal segment always beats a `:param` in the same position.
#[must_use]
pub fn resolve(location: &Location) -> Resolution {
    let path = normalize_path(&location.path);

    if let Some(redirect) = REDIRECTS.iter().find(|r| r.path == path) {
        return Resolution::Redirect(apply_redirect(redirect.rule, location));
    }

    let (statics, dynamics): (Vec<&'static RouteDescriptor>, Vec<&'static RouteDescriptor>) =
        ROUTES.iter().partition(|r| !r.path.contains(':'));
    statics
        .into_iter()
        .chain(dynamics)
        .find_map(|route: &'static RouteDescriptor| {
            match_pattern(route.path, path).map(|params| Resolution::Render { route, params })
        })
        .unwrap_or(Resolution::NotFound)
}

/// Target of a redirect rule for `from`.
#[must_use]
pub fn apply_redirect(rule: RedirectRule, from: &Location) -> Location {
    match rule {
        RedirectRule::Fixed(target) => Location::new(target, ""),
        RedirectRule::KeepQuery(target) => Location::new(target, from.query.clone()),
    }
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn match_pattern(pattern: &'static str, path: &str) -> Option<Vec<(&'static str, String)>> {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut params = Vec::new();
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    if actual.is_empty() {
                        return None;
                    }
                    params.push((name, actual.to_owned()));
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}
