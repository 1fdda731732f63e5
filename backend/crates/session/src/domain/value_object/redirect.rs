//! Redirect Decision Table
//!
//! The entire guard state machine: two booleans in, one of three actions
//! out. Kept as a pure function so the same decision with the same
//! inputs is trivially idempotent and there is no hidden state between
//! requests.

use super::loading_state::LoadingState;
use super::route_class::RouteClass;

/// Outcome of evaluating the guard for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Serve the requested path
    Forward,
    /// Unauthenticated on a protected path
    RedirectToLogin,
    /// Authenticated on the login page
    RedirectToApp,
}

/// Client-side navigation intent, derived and never stored. Recomputed
/// on every evaluation to avoid stale-intent bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectIntent {
    None,
    ToLogin,
    ToApp,
}

/// The request-time decision table:
///
/// | session | path class    | outcome         |
/// |---------|---------------|-----------------|
/// | no      | protected     | redirect login  |
/// | yes     | login page    | redirect app    |
/// | yes     | protected     | forward         |
/// | no      | login page    | forward         |
/// | either  | other         | forward         |
pub fn decide(session_present: bool, class: RouteClass) -> GuardDecision {
    match (session_present, class) {
        (false, RouteClass::ProtectedArea) => GuardDecision::RedirectToLogin,
        (true, RouteClass::LoginPage) => GuardDecision::RedirectToApp,
        _ => GuardDecision::Forward,
    }
}

/// Client-side intent for post-mount navigation the guard cannot see.
/// Never trusts an `Initializing` store.
pub fn client_intent(
    session_present: bool,
    loading: LoadingState,
    class: RouteClass,
) -> RedirectIntent {
    if !loading.is_settled() {
        return RedirectIntent::None;
    }

    match decide(session_present, class) {
        GuardDecision::Forward => {
            // The landing page also sends signed-in users into the app.
            if session_present && class == RouteClass::Other {
                RedirectIntent::ToApp
            } else {
                RedirectIntent::None
            }
        }
        GuardDecision::RedirectToLogin => RedirectIntent::ToLogin,
        GuardDecision::RedirectToApp => RedirectIntent::ToApp,
    }
}
