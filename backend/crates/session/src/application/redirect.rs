//! Redirect Coordinator (client half)
//!
//! Complements the route guard for post-mount transitions the guard
//! cannot see, e.g. the session becoming valid while already on the
//! login page. A client-initiated redirect fires at most once per
//! became-authenticated transition; the one-shot flag resets only when
//! the store observes `session -> None` again. Without the gate,
//! re-renders caused by unrelated state changes would re-invoke
//! navigation repeatedly.

use crate::application::store::StoreSnapshot;
use crate::domain::value_object::redirect::{RedirectIntent, client_intent};
use crate::domain::value_object::route_class::RoutePolicy;

/// Navigation the consumer should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Target path
    pub to: String,
    /// History replacement, not push: the back button must not return
    /// to the login page once authenticated.
    pub replace: bool,
}

/// One-shot redirect gate, owned by whichever component renders the
/// current page. Not persisted; rebuilt per mount like the store.
#[derive(Debug, Default)]
pub struct RedirectGate {
    fired: bool,
}

impl RedirectGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the gate against the current store snapshot and path.
    /// Returns a navigation at most once per authenticated transition.
    pub fn evaluate(&mut self, snapshot: &StoreSnapshot, path: &str, policy: &RoutePolicy) -> Option<Navigation> {
        // Observing an unauthenticated store re-arms the gate.
        if !snapshot.is_authenticated() {
            self.fired = false;
        }

        let intent = client_intent(
            snapshot.is_authenticated(),
            snapshot.loading,
            policy.classify(path),
        );

        match intent {
            RedirectIntent::None => None,
            RedirectIntent::ToLogin => Some(Navigation {
                to: policy.login_path.clone(),
                replace: true,
            }),
            RedirectIntent::ToApp => {
                if self.fired {
                    return None;
                }
                self.fired = true;
                Some(Navigation {
                    to: policy.protected_root().to_string(),
                    replace: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::LoadingState;

    fn snapshot(authenticated: bool, loading: LoadingState) -> StoreSnapshot {
        StoreSnapshot {
            session: authenticated.then(crate::tests::support::make_session),
            loading,
        }
    }

    #[test]
    fn test_one_shot_over_update_sequence() {
        let policy = RoutePolicy::default();
        let mut gate = RedirectGate::new();

        // [None, None, Session, Session, Session] fires exactly once.
        let updates = [false, false, true, true, true];
        let fired: Vec<_> = updates
            .iter()
            .map(|&authed| {
                gate.evaluate(&snapshot(authed, LoadingState::Ready), "/login", &policy)
            })
            .collect();

        assert_eq!(fired.iter().filter(|n| n.is_some()).count(), 1);
        assert_eq!(
            fired[2],
            Some(Navigation {
                to: "/app".to_string(),
                replace: true,
            })
        );
    }

    #[test]
    fn test_gate_rearms_after_sign_out() {
        let policy = RoutePolicy::default();
        let mut gate = RedirectGate::new();

        assert!(
            gate.evaluate(&snapshot(true, LoadingState::Ready), "/login", &policy)
                .is_some()
        );
        assert!(
            gate.evaluate(&snapshot(true, LoadingState::Ready), "/login", &policy)
                .is_none()
        );

        // session -> None resets the flag; the next transition fires again.
        assert!(
            gate.evaluate(&snapshot(false, LoadingState::Ready), "/login", &policy)
                .is_none()
        );
        assert!(
            gate.evaluate(&snapshot(true, LoadingState::Ready), "/login", &policy)
                .is_some()
        );
    }

    #[test]
    fn test_no_navigation_while_initializing() {
        let policy = RoutePolicy::default();
        let mut gate = RedirectGate::new();

        assert!(
            gate.evaluate(
                &snapshot(true, LoadingState::Initializing),
                "/login",
                &policy
            )
            .is_none()
        );
    }

    #[test]
    fn test_unauthenticated_on_protected_path_goes_to_login() {
        let policy = RoutePolicy::default();
        let mut gate = RedirectGate::new();

        assert_eq!(
            gate.evaluate(&snapshot(false, LoadingState::Ready), "/app/chat/42", &policy),
            Some(Navigation {
                to: "/login".to_string(),
                replace: true,
            })
        );
    }

    #[test]
    fn test_token_refresh_on_protected_path_does_not_navigate() {
        let policy = RoutePolicy::default();
        let mut gate = RedirectGate::new();

        // Already inside the app: an authenticated snapshot on a
        // protected path forwards, so repeated refreshes never navigate.
        for _ in 0..3 {
            assert!(
                gate.evaluate(&snapshot(true, LoadingState::Ready), "/app", &policy)
                    .is_none()
            );
        }
    }
}
