//! Loading State
//!
//! Named states for the session store, replacing the scattered booleans
//! the UI would otherwise accumulate. Owned exclusively by the store;
//! consumers use it to decide what may render and whether a redirect
//! decision is trustworthy (never while `Initializing`).

use serde::Serialize;

/// Session store loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    /// Initial session fetch has not settled yet
    Initializing,
    /// Store reflects the adapter's last known answer
    Ready,
    /// A sign-in operation is in flight
    SigningIn,
    /// A sign-out operation is in flight
    SigningOut,
}

impl LoadingState {
    /// Terminal for the initial fetch: every consumer is guaranteed to
    /// observe a settled state eventually.
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadingState::Initializing)
    }

    /// Whether a new sign-in/sign-out may begin; at most one transition
    /// is outstanding per store.
    pub fn can_begin_operation(&self) -> bool {
        matches!(self, LoadingState::Ready)
    }
}

impl std::fmt::Display for LoadingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoadingState::Initializing => "initializing",
            LoadingState::Ready => "ready",
            LoadingState::SigningIn => "signing_in",
            LoadingState::SigningOut => "signing_out",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_states() {
        assert!(!LoadingState::Initializing.is_settled());
        assert!(LoadingState::Ready.is_settled());
        assert!(LoadingState::SigningIn.is_settled());
        assert!(LoadingState::SigningOut.is_settled());
    }

    #[test]
    fn test_single_flight_gate() {
        assert!(LoadingState::Ready.can_begin_operation());
        assert!(!LoadingState::Initializing.can_begin_operation());
        assert!(!LoadingState::SigningIn.can_begin_operation());
        assert!(!LoadingState::SigningOut.can_begin_operation());
    }
}
