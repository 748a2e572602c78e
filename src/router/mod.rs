//! Route table and navigation guard.
//!
//! ARCHITECTURE
//! ============
//! `routes` is pure data plus location matching. `guard` decides whether a
//! navigation may proceed. Neither touches the DOM; `components::guarded`
//! glues them to the Leptos router.

pub mod guard;
pub mod routes;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/home";

pub use guard::{CheckSequencer, GuardDecision, RouteGuard, SessionCheck, decide};
pub use routes::{Location, Resolution, RouteMeta, resolve};
