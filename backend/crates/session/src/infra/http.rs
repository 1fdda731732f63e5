//! HTTP Auth Backend
//!
//! Implements the adapter traits against a GoTrue-style identity
//! provider REST surface: user lookup, logout, authorize-URL
//! construction, and the refresh-token grant. Session persistence
//! lives entirely at the provider; this adapter only shuttles opaque
//! tokens.

use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use platform::cookie::CookieConfig;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use url::Url;

use crate::application::config::SessionConfig;
use crate::domain::adapter::{
    AuthBackend, AuthorizeRedirect, EventSubscription, RequestAuthClient, RequestClientFactory,
    SignInCompletion, SignInOptions,
};
use crate::domain::entity::{Session, UserIdentity};
use crate::domain::value_object::SessionEvent;
use crate::error::{SessionError, SessionResult};

/// OAuth provider identifier sent to the authorize endpoint
const OAUTH_PROVIDER: &str = "google";

/// Refresh ahead of expiry so a token never goes stale mid-request
const REFRESH_MARGIN_MS: i64 = 60_000;

// ============================================================================
// Provider wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: uuid::Uuid,
    email: Option<String>,
    user_metadata: Option<ProviderUserMetadata>,
}

#[derive(Debug, Deserialize)]
struct ProviderUserMetadata {
    full_name: Option<String>,
    name: Option<String>,
}

impl ProviderUser {
    fn into_identity(self) -> UserIdentity {
        let display_name = self
            .user_metadata
            .and_then(|m| m.full_name.or(m.name));

        UserIdentity {
            id: kernel::id::UserId::from_uuid(self.id),
            email: self.email,
            display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: ProviderUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let now = Utc::now();
        Session {
            user: self.user.into_identity(),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            issued_at: now,
            expires_at_ms: now.timestamp_millis() + self.expires_in * 1000,
        }
    }
}

/// Opaque session cookie payload (provider-owned format)
#[derive(Debug, Serialize, Deserialize)]
struct CookiePayload {
    access_token: String,
    refresh_token: String,
    expires_at_ms: i64,
}

impl CookiePayload {
    fn encode(&self) -> SessionResult<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| SessionError::Internal(format!("Cookie payload encoding: {e}")))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// A cookie that fails to decode is "no session", never an error.
    fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

// ============================================================================
// Long-lived backend (client/store side)
// ============================================================================

/// Auth backend adapter talking to the external identity provider
pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    config: Arc<SessionConfig>,
    current: Mutex<Option<Session>>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<SessionEvent>>>,
}

impl HttpAuthBackend {
    pub fn new(base_url: Url, anon_key: String, config: Arc<SessionConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key,
            config,
            current: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> SessionResult<Option<UserIdentity>> {
        let url = self.endpoint("auth/v1/user")?;

        let response = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        let user: ProviderUser = response.error_for_status()?.json().await?;
        Ok(Some(user.into_identity()))
    }

    async fn refresh(&self, refresh_token: &str) -> SessionResult<Option<TokenResponse>> {
        refresh_grant(
            &self.http,
            &self.base_url,
            &self.anon_key,
            refresh_token,
        )
        .await
    }

    fn endpoint(&self, path: &str) -> SessionResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SessionError::Internal(format!("Invalid provider endpoint: {e}")))
    }

    fn emit(&self, event: SessionEvent) {
        let mut listeners = self.listeners.lock().expect("backend listener lock");
        listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.config.session_cookie_name.clone(),
            secure: self.config.cookie_secure,
            http_only: true,
            same_site: self.config.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl AuthBackend for HttpAuthBackend {
    async fn get_current_session(&self) -> SessionResult<Option<Session>> {
        let current = self
            .current
            .lock()
            .expect("backend session lock")
            .clone();

        let Some(session) = current else {
            return Ok(None);
        };

        if session.remaining_ms() > REFRESH_MARGIN_MS {
            return Ok(Some(session));
        }

        // Expiring or expired: refresh transparently.
        match self.refresh(&session.refresh_token).await? {
            Some(tokens) => {
                let refreshed = tokens.into_session();
                *self.current.lock().expect("backend session lock") = Some(refreshed.clone());
                self.emit(SessionEvent::token_refreshed(refreshed.clone()));
                Ok(Some(refreshed))
            }
            None => {
                // Refresh capability revoked: the session is gone.
                *self.current.lock().expect("backend session lock") = None;
                self.emit(SessionEvent::signed_out());
                Ok(None)
            }
        }
    }

    async fn begin_oauth_sign_in(
        &self,
        options: &SignInOptions,
    ) -> SessionResult<AuthorizeRedirect> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", OAUTH_PROVIDER)
            .append_pair("redirect_to", options.redirect_target.as_str())
            .append_pair("state", &options.state);

        Ok(AuthorizeRedirect { url })
    }

    /// Complete a sign-in from OAuth callback tokens: verify the access
    /// token against the provider, hold the session, announce it, and
    /// build the cookie the route guard verifies on later requests.
    async fn complete_sign_in(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_in: i64,
    ) -> SessionResult<SignInCompletion> {
        let user = self
            .fetch_user(access_token)
            .await?
            .ok_or(SessionError::SessionInvalid)?;

        let now = Utc::now();
        let session = Session {
            user,
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            issued_at: now,
            expires_at_ms: now.timestamp_millis() + expires_in * 1000,
        };

        let payload = CookiePayload {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at_ms: session.expires_at_ms,
        };
        let cookie = self.cookie_config().build_set_cookie(&payload.encode()?);

        *self.current.lock().expect("backend session lock") = Some(session.clone());
        self.emit(SessionEvent::signed_in(session.clone()));

        Ok(SignInCompletion {
            session,
            cookies: vec![cookie],
        })
    }

    async fn sign_out(&self, access_token: &str) -> SessionResult<()> {
        let url = self.endpoint("auth/v1/logout")?;

        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        // An already-dead token means the sign-out goal is met.
        if response.status() != StatusCode::UNAUTHORIZED {
            response.error_for_status()?;
        }

        *self.current.lock().expect("backend session lock") = None;
        self.emit(SessionEvent::signed_out());

        Ok(())
    }

    fn subscribe(&self) -> EventSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .expect("backend listener lock")
            .push(tx);
        EventSubscription::new(rx)
    }
}

impl RequestClientFactory for HttpAuthBackend {
    type Client = HttpRequestClient;

    fn client_for(&self, cookie_header: Option<&str>) -> HttpRequestClient {
        let cookie_value = cookie_header.and_then(|header| {
            platform::cookie::extract_cookie_from_header(
                header,
                &self.config.session_cookie_name,
            )
        });

        HttpRequestClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            anon_key: self.anon_key.clone(),
            cookie_config: self.cookie_config(),
            cookie_value,
            refreshed: Mutex::new(Vec::new()),
        }
    }
}

// ============================================================================
// Request-scoped client (route guard side)
// ============================================================================

/// Per-request adapter client bound to one request's cookies.
///
/// Holds no state shared with other requests; refreshed cookies are
/// recorded for the guard to write onto the outgoing response.
pub struct HttpRequestClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    cookie_config: CookieConfig,
    cookie_value: Option<String>,
    refreshed: Mutex<Vec<String>>,
}

impl RequestAuthClient for HttpRequestClient {
    async fn verify_session(&self) -> SessionResult<Option<Session>> {
        let Some(payload) = self
            .cookie_value
            .as_deref()
            .and_then(CookiePayload::decode)
        else {
            return Ok(None);
        };

        let now_ms = Utc::now().timestamp_millis();
        if payload.expires_at_ms - now_ms > REFRESH_MARGIN_MS {
            // Token still fresh: verify it names a live user.
            match self.fetch_user(&payload.access_token).await? {
                Some(user) => {
                    return Ok(Some(Session {
                        user,
                        access_token: payload.access_token,
                        refresh_token: payload.refresh_token,
                        issued_at: Utc::now(),
                        expires_at_ms: payload.expires_at_ms,
                    }));
                }
                // Token revoked out-of-band; fall through to refresh.
                None => {}
            }
        }

        let Some(tokens) =
            refresh_grant(&self.http, &self.base_url, &self.anon_key, &payload.refresh_token)
                .await?
        else {
            return Ok(None);
        };

        let session = tokens.into_session();
        self.record_refreshed_cookie(&session)?;

        Ok(Some(session))
    }

    fn refreshed_cookies(&self) -> Vec<String> {
        self.refreshed.lock().expect("refresh lock").clone()
    }
}

impl HttpRequestClient {
    async fn fetch_user(&self, access_token: &str) -> SessionResult<Option<UserIdentity>> {
        let url = join_endpoint(&self.base_url, "auth/v1/user")?;

        let response = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        let user: ProviderUser = response.error_for_status()?.json().await?;
        Ok(Some(user.into_identity()))
    }

    fn record_refreshed_cookie(&self, session: &Session) -> SessionResult<()> {
        let payload = CookiePayload {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at_ms: session.expires_at_ms,
        };

        let cookie = self.cookie_config.build_set_cookie(&payload.encode()?);
        self.refreshed.lock().expect("refresh lock").push(cookie);

        Ok(())
    }
}

// ============================================================================
// Shared provider calls
// ============================================================================

/// Exchange a refresh token. `Ok(None)` means the provider rejected the
/// capability (revoked / already rotated), which is "no session" rather
/// than a transport failure.
async fn refresh_grant(
    http: &reqwest::Client,
    base_url: &Url,
    anon_key: &str,
    refresh_token: &str,
) -> SessionResult<Option<TokenResponse>> {
    let mut url = join_endpoint(base_url, "auth/v1/token")?;
    url.query_pairs_mut()
        .append_pair("grant_type", "refresh_token");

    let response = http
        .post(url)
        .header("apikey", anon_key)
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await?;

    if response.status().is_client_error() {
        return Ok(None);
    }

    let tokens: TokenResponse = response.error_for_status()?.json().await?;
    Ok(Some(tokens))
}

fn join_endpoint(base_url: &Url, path: &str) -> SessionResult<Url> {
    base_url
        .join(path)
        .map_err(|e| SessionError::Internal(format!("Invalid provider endpoint: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpAuthBackend {
        HttpAuthBackend::new(
            Url::parse("https://id.example.com").unwrap(),
            "anon-key".to_string(),
            Arc::new(SessionConfig::development()),
        )
    }

    #[tokio::test]
    async fn test_authorize_url_carries_target_and_state() {
        let backend = backend();
        let options = SignInOptions {
            redirect_target: Url::parse("http://localhost:3000/app").unwrap(),
            state: "nonce123".to_string(),
        };

        let redirect = backend.begin_oauth_sign_in(&options).await.unwrap();

        assert!(redirect.url.as_str().starts_with(
            "https://id.example.com/auth/v1/authorize?provider=google"
        ));
        let query: Vec<_> = redirect.url.query_pairs().collect();
        assert!(
            query
                .iter()
                .any(|(k, v)| k == "redirect_to" && v == "http://localhost:3000/app")
        );
        assert!(query.iter().any(|(k, v)| k == "state" && v == "nonce123"));
    }

    #[test]
    fn test_cookie_payload_roundtrip() {
        let payload = CookiePayload {
            access_token: "acc".to_string(),
            refresh_token: "ref".to_string(),
            expires_at_ms: 123_456,
        };

        let encoded = payload.encode().unwrap();
        let decoded = CookiePayload::decode(&encoded).unwrap();
        assert_eq!(decoded.access_token, "acc");
        assert_eq!(decoded.refresh_token, "ref");
        assert_eq!(decoded.expires_at_ms, 123_456);
    }

    #[test]
    fn test_cookie_payload_garbage_is_no_session() {
        assert!(CookiePayload::decode("not base64 json!").is_none());
        assert!(CookiePayload::decode("bm90IGpzb24").is_none());
    }

    #[test]
    fn test_provider_user_display_name_preference() {
        let user = ProviderUser {
            id: uuid::Uuid::new_v4(),
            email: Some("ada@example.com".to_string()),
            user_metadata: Some(ProviderUserMetadata {
                full_name: Some("Ada Lovelace".to_string()),
                name: Some("ada".to_string()),
            }),
        };
        assert_eq!(
            user.into_identity().display_name,
            Some("Ada Lovelace".to_string())
        );

        let user = ProviderUser {
            id: uuid::Uuid::new_v4(),
            email: None,
            user_metadata: Some(ProviderUserMetadata {
                full_name: None,
                name: Some("ada".to_string()),
            }),
        };
        assert_eq!(user.into_identity().display_name, Some("ada".to_string()));
    }

    #[test]
    fn test_request_client_extracts_named_cookie() {
        let backend = backend();
        let client =
            backend.client_for(Some("foo=bar; theta_session=abc123; other=1"));
        assert_eq!(client.cookie_value, Some("abc123".to_string()));

        let client = backend.client_for(None);
        assert_eq!(client.cookie_value, None);
    }
}
