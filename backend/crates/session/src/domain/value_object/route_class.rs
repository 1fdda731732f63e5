//! Route Classification
//!
//! Classifies request paths for the route guard. Exactly one canonical
//! login path, one protected prefix; everything else is `Other`. Paths
//! on the exclusion list (static assets, API endpoints, the OAuth
//! callback) are never evaluated by the guard at all — evaluating the
//! callback before the handshake completes would itself cause a
//! redirect loop.

/// Path class consumed by the guard decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// The canonical login page
    LoginPage,
    /// Anything under the protected area prefix
    ProtectedArea,
    /// Public landing page and everything else navigable
    Other,
}

/// Routing configuration the guard classifies against
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    /// Canonical login path (exact match)
    pub login_path: String,
    /// Protected area prefix
    pub protected_prefix: String,
    /// Prefixes passed straight through (static assets, API)
    pub excluded_prefixes: Vec<String>,
    /// OAuth callback path (exact match, always excluded)
    pub oauth_callback_path: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            protected_prefix: "/app".to_string(),
            excluded_prefixes: vec!["/_assets".to_string(), "/api".to_string()],
            oauth_callback_path: "/auth/callback".to_string(),
        }
    }
}

impl RoutePolicy {
    /// Whether the guard must not evaluate this path at all.
    ///
    /// A path segment containing a dot is treated as a static file
    /// request (favicon.ico, *.js, ...), matching the original matcher.
    pub fn is_excluded(&self, path: &str) -> bool {
        if path == self.oauth_callback_path {
            return true;
        }
        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return true;
        }
        path.contains('.')
    }

    /// Classify a non-excluded path
    pub fn classify(&self, path: &str) -> RouteClass {
        if path == self.login_path {
            RouteClass::LoginPage
        } else if self.is_protected(path) {
            RouteClass::ProtectedArea
        } else {
            RouteClass::Other
        }
    }

    fn is_protected(&self, path: &str) -> bool {
        // "/app" and "/app/...", but not "/application"
        path == self.protected_prefix
            || path
                .strip_prefix(self.protected_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Protected area root (post-login destination)
    pub fn protected_root(&self) -> &str {
        &self.protected_prefix
    }
}
