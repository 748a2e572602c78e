//! Navigation guard.
//!
//! DESIGN
//! ======
//! The guard is fail-closed: anything short of a positive session answer
//! sends the user to `/login`. Authorization failures on admin routes are a
//! silent downgrade to `/home`, never an error page.
//!
//! Session state is fetched fresh for every protected navigation. Nothing is
//! cached, so the decision always reflects the server's current view.
//!
//! When checks overlap, the newest navigation wins: [`CheckSequencer`] hands
//! out tickets and a finished check whose ticket is stale is discarded.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::routes::RouteMeta;
use super::{HOME_PATH, LOGIN_PATH};
use crate::net::ApiClient;
use crate::net::ApiResult;
use crate::net::types::{Role, SessionResponse};

/// Outcome of asking the backend who the caller is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCheck {
    /// Positive answer with a user attached.
    Authenticated(Role),
    /// The backend answered but did not vouch for a session.
    Denied,
    /// No usable answer (transport failure, error status, bad body).
    Unavailable(String),
}

impl SessionCheck {
    /// Interpret the result of `GET /api/get_user`.
    #[must_use]
    pub fn from_result(result: ApiResult) -> Self {
        let body = match result {
            Ok(body) => body,
            Err(err) => return Self::Unavailable(err.message()),
        };
        match serde_json::from_value::<SessionResponse>(body) {
            Ok(SessionResponse { success: true, user: Some(user) }) => Self::Authenticated(user.role),
            Ok(_) => Self::Denied,
            Err(err) => Self::Unavailable(format!("malformed session response: {err}")),
        }
    }
}

/// Terminal state of one navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectHome,
    RedirectLogin,
}

impl GuardDecision {
    /// Where to send the user instead, if anywhere.
    #[must_use]
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectHome => Some(HOME_PATH),
            Self::RedirectLogin => Some(LOGIN_PATH),
        }
    }
}

/// Pure decision for a protected route given a session check.
///
/// Public routes never reach this function; see [`RouteGuard::check`].
#[must_use]
pub fn decide(meta: RouteMeta, check: &SessionCheck) -> GuardDecision {
    match check {
        SessionCheck::Authenticated(role) if meta.requires_admin && !role.is_admin() => GuardDecision::RedirectHome,
        SessionCheck::Authenticated(_) => GuardDecision::Allow,
        SessionCheck::Denied | SessionCheck::Unavailable(_) => GuardDecision::RedirectLogin,
    }
}

/// Something that can tell the guard about the current session.
#[async_trait(?Send)]
pub trait SessionSource {
    async fn current_session(&self) -> SessionCheck;
}

#[async_trait(?Send)]
impl SessionSource for ApiClient {
    async fn current_session(&self) -> SessionCheck {
        SessionCheck::from_result(self.get_current_user().await)
    }
}

/// Runs the per-navigation state machine against a [`SessionSource`].
pub struct RouteGuard<S> {
    source: S,
}

impl<S: SessionSource> RouteGuard<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Decide a navigation to a route with `meta`.
    ///
    /// Public routes are allowed without touching the network.
    pub async fn check(&self, meta: RouteMeta) -> GuardDecision {
        if !meta.is_protected() {
            return GuardDecision::Allow;
        }
        let session = self.source.current_session().await;
        if let SessionCheck::Unavailable(reason) = &session {
            log::warn!("session check failed, denying: {reason}");
        }
        let decision = decide(meta, &session);
        log::debug!("guard decision: {decision:?} for {meta:?}");
        decision
    }

    /// [`check`](Self::check) for the navigation holding `ticket`.
    ///
    /// Returns `None` when a later navigation took a ticket while this one
    /// was in flight; the caller must then neither render nor redirect.
    pub async fn check_current(
        &self,
        meta: RouteMeta,
        sequencer: &CheckSequencer,
        ticket: CheckTicket,
    ) -> Option<GuardDecision> {
        let decision = self.check(meta).await;
        if sequencer.is_current(ticket) {
            Some(decision)
        } else {
            log::debug!("discarding superseded guard decision {decision:?}");
            None
        }
    }
}

/// Ticket identifying one in-flight guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckTicket(u64);

/// Last-write-wins ordering for overlapping guard checks.
#[derive(Clone, Debug, Default)]
pub struct CheckSequencer {
    latest: Arc<AtomicU64>,
}

impl CheckSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation, superseding every earlier one. Public routes take
    /// a ticket too.
    pub fn begin(&self) -> CheckTicket {
        CheckTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer check has started since `ticket` was issued.
    #[must_use]
    pub fn is_current(&self, ticket: CheckTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
