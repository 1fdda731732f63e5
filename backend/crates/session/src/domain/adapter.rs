//! Auth Backend Adapter Traits
//!
//! Capability surface of the external identity provider. The provider's
//! OAuth protocol is not reimplemented here; these traits are the whole
//! contract, and the infrastructure layer supplies the implementation.

use tokio::sync::mpsc;
use url::Url;

use crate::domain::entity::Session;
use crate::domain::value_object::SessionEvent;
use crate::error::SessionResult;

/// Options for starting an OAuth sign-in
#[derive(Debug, Clone)]
pub struct SignInOptions {
    /// Post-login destination (always the protected area root)
    pub redirect_target: Url,
    /// Fresh per-attempt state nonce
    pub state: String,
}

/// Where the browser must navigate to begin the provider handshake
#[derive(Debug, Clone)]
pub struct AuthorizeRedirect {
    pub url: Url,
}

/// Outcome of completing an OAuth sign-in from callback tokens
#[derive(Debug, Clone)]
pub struct SignInCompletion {
    pub session: Session,
    /// Set-Cookie values that establish the session for the route guard
    pub cookies: Vec<String>,
}

/// Handle to the adapter's change subscription. Dropping it releases
/// the listener; the store guarantees that happens exactly once.
#[derive(Debug)]
pub struct EventSubscription {
    receiver: mpsc::UnboundedReceiver<SessionEvent>,
}

impl EventSubscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        Self { receiver }
    }

    /// Receive the next event in the order the adapter emitted it.
    /// Returns `None` once the adapter side is gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.receiver.recv().await
    }
}

/// Long-lived auth backend capability (client/store side)
#[trait_variant::make(AuthBackend: Send)]
pub trait LocalAuthBackend {
    /// Fetch the provider's current session, if any
    async fn get_current_session(&self) -> SessionResult<Option<Session>>;

    /// Start an OAuth sign-in; returns where to navigate
    async fn begin_oauth_sign_in(
        &self,
        options: &SignInOptions,
    ) -> SessionResult<AuthorizeRedirect>;

    /// Complete an OAuth sign-in from the tokens the provider delivered
    /// to the callback page. Verifies the access token, emits
    /// `SignedIn`, and produces the cookies that establish the session.
    async fn complete_sign_in(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_in: i64,
    ) -> SessionResult<SignInCompletion>;

    /// Invalidate the current session at the provider
    async fn sign_out(&self, access_token: &str) -> SessionResult<()>;

    /// Register with the provider's change subscription
    fn subscribe(&self) -> EventSubscription;
}

/// Request-scoped auth capability (route guard side)
///
/// Constructed per request, bound to that request's cookies, with no
/// state shared between invocations. If verifying triggers a token
/// refresh, the refreshed cookies are recorded for the response.
#[trait_variant::make(RequestAuthClient: Send)]
pub trait LocalRequestAuthClient {
    /// Verify whether this request carries a valid session
    async fn verify_session(&self) -> SessionResult<Option<Session>>;

    /// Set-Cookie values produced while verifying (refreshed session)
    fn refreshed_cookies(&self) -> Vec<String>;
}

/// Factory deriving a request-scoped client from the incoming Cookie
/// header. Keeps the guard middleware generic over the adapter.
pub trait RequestClientFactory: Send + Sync {
    type Client: RequestAuthClient + Send + Sync;

    fn client_for(&self, cookie_header: Option<&str>) -> Self::Client;
}
