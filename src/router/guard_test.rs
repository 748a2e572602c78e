use super::*;
use crate::net::ApiError;
use crate::net::testing::client;
use crate::net::transport::{RawResponse, TransportError};
use futures::executor::block_on;
use serde_json::json;
use std::cell::Cell;

/// Session source that counts calls and returns a fixed answer.
struct FixedSession {
    answer: SessionCheck,
    calls: Cell<usize>,
}

impl FixedSession {
    fn new(answer: SessionCheck) -> Self {
        Self { answer, calls: Cell::new(0) }
    }
}

#[async_trait(?Send)]
impl SessionSource for &FixedSession {
    async fn current_session(&self) -> SessionCheck {
        self.calls.set(self.calls.get() + 1);
        self.answer.clone()
    }
}

fn all_answers() -> Vec<SessionCheck> {
    vec![
        SessionCheck::Authenticated(Role::Admin),
        SessionCheck::Authenticated(Role::Member),
        SessionCheck::Denied,
        SessionCheck::Unavailable("timeout".to_owned()),
    ]
}

// =============================================================
// decide
// =============================================================

#[test]
fn failing_session_redirects_to_login_for_every_protected_meta() {
    for meta in [RouteMeta::AUTH, RouteMeta::ADMIN] {
        assert_eq!(decide(meta, &SessionCheck::Denied), GuardDecision::RedirectLogin);
        assert_eq!(decide(meta, &SessionCheck::Unavailable(String::new())), GuardDecision::RedirectLogin);
    }
}

#[test]
fn non_admin_on_admin_route_goes_home() {
    assert_eq!(decide(RouteMeta::ADMIN, &SessionCheck::Authenticated(Role::Member)), GuardDecision::RedirectHome);
    assert_eq!(
        decide(RouteMeta::ADMIN, &SessionCheck::Authenticated(Role::Other("editor".to_owned()))),
        GuardDecision::RedirectHome
    );
}

#[test]
fn admin_on_admin_route_is_allowed() {
    assert_eq!(decide(RouteMeta::ADMIN, &SessionCheck::Authenticated(Role::Admin)), GuardDecision::Allow);
}

#[test]
fn any_authenticated_role_passes_auth_routes() {
    assert_eq!(decide(RouteMeta::AUTH, &SessionCheck::Authenticated(Role::Member)), GuardDecision::Allow);
    assert_eq!(decide(RouteMeta::AUTH, &SessionCheck::Authenticated(Role::Admin)), GuardDecision::Allow);
}

#[test]
fn admin_flag_alone_still_requires_admin() {
    let meta = RouteMeta { requires_auth: false, requires_admin: true };
    assert_eq!(decide(meta, &SessionCheck::Authenticated(Role::Member)), GuardDecision::RedirectHome);
}

#[test]
fn redirect_paths() {
    assert_eq!(GuardDecision::Allow.redirect_path(), None);
    assert_eq!(GuardDecision::RedirectHome.redirect_path(), Some("/home"));
    assert_eq!(GuardDecision::RedirectLogin.redirect_path(), Some("/login"));
}

// =============================================================
// RouteGuard
// =============================================================

#[test]
fn public_routes_are_allowed_without_a_session_call() {
    for answer in all_answers() {
        let source = FixedSession::new(answer);
        let decision = block_on(RouteGuard::new(&source).check(RouteMeta::PUBLIC));
        assert_eq!(decision, GuardDecision::Allow);
        assert_eq!(source.calls.get(), 0);
    }
}

#[test]
fn protected_routes_check_the_session_exactly_once() {
    let source = FixedSession::new(SessionCheck::Authenticated(Role::Member));
    let guard = RouteGuard::new(&source);
    assert_eq!(block_on(guard.check(RouteMeta::AUTH)), GuardDecision::Allow);
    assert_eq!(block_on(guard.check(RouteMeta::ADMIN)), GuardDecision::RedirectHome);
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn public_routes_issue_no_request_through_the_api_client() {
    let (api, transport, _) = client();
    assert_eq!(block_on(RouteGuard::new(api).check(RouteMeta::PUBLIC)), GuardDecision::Allow);
    assert!(transport.requests().is_empty());
}

#[test]
fn api_backed_guard_allows_admin() {
    let (api, transport, _) = client();
    transport.push_json(200, json!({ "success": true, "user": { "id": 1, "role": "admin" } }));
    assert_eq!(block_on(RouteGuard::new(api).check(RouteMeta::ADMIN)), GuardDecision::Allow);
    assert!(transport.last().url.ends_with("/api/get_user"));
}

#[test]
fn api_backed_guard_sends_negative_session_to_login() {
    let (api, transport, _) = client();
    transport.push_json(200, json!({ "success": false }));
    assert_eq!(block_on(RouteGuard::new(api).check(RouteMeta::AUTH)), GuardDecision::RedirectLogin);
}

#[test]
fn api_backed_guard_fails_closed_on_transport_errors() {
    let (api, transport, _) = client();
    transport.push(Err(TransportError::Network(String::new())));
    transport.push(Ok(RawResponse::new(500, "")));
    transport.push_json(401, json!({ "success": false, "error": "expired" }));
    let guard = RouteGuard::new(api);
    for _ in 0..3 {
        assert_eq!(block_on(guard.check(RouteMeta::AUTH)), GuardDecision::RedirectLogin);
    }
}

// =============================================================
// SessionCheck::from_result
// =============================================================

#[test]
fn success_without_user_is_denied() {
    assert_eq!(SessionCheck::from_result(Ok(json!({ "success": true }))), SessionCheck::Denied);
}

#[test]
fn success_with_roleless_user_is_a_member() {
    assert_eq!(
        SessionCheck::from_result(Ok(json!({ "success": true, "user": { "id": 3 } }))),
        SessionCheck::Authenticated(Role::Member)
    );
}

#[test]
fn non_object_body_is_unavailable() {
    assert!(matches!(SessionCheck::from_result(Ok(json!("<html>"))), SessionCheck::Unavailable(_)));
}

#[test]
fn api_error_is_unavailable_with_its_message() {
    let check = SessionCheck::from_result(Err(ApiError::Network { message: "offline".to_owned() }));
    assert_eq!(check, SessionCheck::Unavailable("offline".to_owned()));
}

// =============================================================
// CheckSequencer
// =============================================================

#[test]
fn newest_check_wins() {
    let sequencer = CheckSequencer::new();
    let first = sequencer.begin();
    assert!(sequencer.is_current(first));
    let second = sequencer.begin();
    assert!(!sequencer.is_current(first));
    assert!(sequencer.is_current(second));
}

#[test]
fn clones_share_one_sequence() {
    let sequencer = CheckSequencer::new();
    let shared = sequencer.clone();
    let ticket = sequencer.begin();
    shared.begin();
    assert!(!sequencer.is_current(ticket));
}

#[test]
fn integer_success_flag_counts_as_authenticated() {
    let body = json!({ "success": 1, "user": { "id": 1, "role": "user" } });
    assert_eq!(SessionCheck::from_result(Ok(body)), SessionCheck::Authenticated(Role::Member));
    let body = json!({ "success": "1", "user": { "id": 1, "role": "admin" } });
    assert_eq!(SessionCheck::from_result(Ok(body)), SessionCheck::Authenticated(Role::Admin));
}

#[test]
fn falsy_success_flag_is_denied() {
    for flag in [json!(0), json!(""), json!(null), json!(false)] {
        let body = json!({ "success": flag, "user": { "id": 1 } });
        assert_eq!(SessionCheck::from_result(Ok(body)), SessionCheck::Denied, "flag {flag}");
    }
}

#[test]
fn null_role_is_a_member_allowed_on_auth_routes() {
    let body = json!({ "success": true, "user": { "id": 1, "role": null } });
    let check = SessionCheck::from_result(Ok(body));
    assert_eq!(check, SessionCheck::Authenticated(Role::Member));
    assert_eq!(decide(RouteMeta::AUTH, &check), GuardDecision::Allow);
    assert_eq!(decide(RouteMeta::ADMIN, &check), GuardDecision::RedirectHome);
}

#[test]
fn non_string_role_is_a_member() {
    let body = json!({ "success": true, "user": { "id": 1, "role": 1 } });
    assert_eq!(SessionCheck::from_result(Ok(body)), SessionCheck::Authenticated(Role::Member));
}

/// Session source that answers `Denied`, but only after a later navigation
/// to a public route has started.
struct OvertakenSession {
    sequencer: CheckSequencer,
}

#[async_trait(?Send)]
impl SessionSource for &OvertakenSession {
    async fn current_session(&self) -> SessionCheck {
        self.sequencer.begin();
        SessionCheck::Denied
    }
}

#[test]
fn public_navigation_supersedes_pending_protected_check() {
    let sequencer = CheckSequencer::new();
    let source = OvertakenSession { sequencer: sequencer.clone() };
    let ticket = sequencer.begin();
    let decision = block_on(RouteGuard::new(&source).check_current(RouteMeta::AUTH, &sequencer, ticket));
    assert_eq!(decision, None);
}

#[test]
fn current_check_returns_its_decision() {
    let sequencer = CheckSequencer::new();
    let source = FixedSession::new(SessionCheck::Denied);
    let ticket = sequencer.begin();
    let decision = block_on(RouteGuard::new(&source).check_current(RouteMeta::AUTH, &sequencer, ticket));
    assert_eq!(decision, Some(GuardDecision::RedirectLogin));
}

#[test]
fn public_ticket_invalidates_earlier_protected_ticket() {
    let sequencer = CheckSequencer::new();
    let source = FixedSession::new(SessionCheck::Denied);
    let protected = sequencer.begin();
    let public = sequencer.begin();
    let guard = RouteGuard::new(&source);
    assert_eq!(block_on(guard.check_current(RouteMeta::PUBLIC, &sequencer, public)), Some(GuardDecision::Allow));
    assert_eq!(block_on(guard.check_current(RouteMeta::AUTH, &sequencer, protected)), None);
    assert_eq!(source.calls.get(), 1);
}

#[test]
fn repeated_visits_to_one_route_each_check_the_session() {
    let sequencer = CheckSequencer::new();
    let source = FixedSession::new(SessionCheck::Authenticated(Role::Member));
    let guard = RouteGuard::new(&source);
    for _ in 0..2 {
        let ticket = sequencer.begin();
        assert_eq!(block_on(guard.check_current(RouteMeta::AUTH, &sequencer, ticket)), Some(GuardDecision::Allow));
    }
    assert_eq!(source.calls.get(), 2);
}
