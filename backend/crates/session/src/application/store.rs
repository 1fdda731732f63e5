//! Session Store
//!
//! Holds and broadcasts `{session, loading}` for one client tab's
//! lifetime. Single source of truth for client-rendered UI; the route
//! guard never reads it - the guard re-verifies per request and is the
//! security boundary, the store is UI convenience.
//!
//! State machine: `Initializing -> Ready <-> SigningIn/SigningOut`.
//! The store always reaches a settled state after `initialize`, even on
//! adapter errors (fail open to "unauthenticated" - UI liveness beats
//! access pessimism on this side).
//!
//! Known risk, deliberately not handled here: a hung adapter call keeps
//! the store at `Initializing`/`SigningIn` indefinitely. No timeout is
//! modeled; callers own cancellation policy.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::config::SessionConfig;
use crate::application::sign_in::SignInFlow;
use crate::domain::adapter::{AuthBackend, AuthorizeRedirect};
use crate::domain::entity::Session;
use crate::domain::value_object::{AuthEvent, LoadingState, SessionEvent};
use crate::error::{SessionError, SessionResult};

/// Immutable view of the store, broadcast on every change
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub session: Option<Session>,
    pub loading: LoadingState,
}

impl StoreSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

struct StoreInner {
    session: Option<Session>,
    loading: LoadingState,
    /// Cleared by teardown; in-flight results against a dead store are
    /// discarded instead of applied.
    live: bool,
    /// Set when a sign-out was acknowledged; session-bearing events
    /// issued before this instant are stale and must not resurrect the
    /// cleared session.
    cleared_at_ms: Option<i64>,
    /// Event pump task; taken exactly once by teardown.
    pump: Option<JoinHandle<()>>,
}

/// Per-tab session store
pub struct SessionStore<B>
where
    B: AuthBackend + Send + Sync + 'static,
{
    backend: Arc<B>,
    config: Arc<SessionConfig>,
    inner: Mutex<StoreInner>,
    watch_tx: watch::Sender<StoreSnapshot>,
}

impl<B> SessionStore<B>
where
    B: AuthBackend + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, config: Arc<SessionConfig>) -> Arc<Self> {
        let (watch_tx, _) = watch::channel(StoreSnapshot {
            session: None,
            loading: LoadingState::Initializing,
        });

        Arc::new(Self {
            backend,
            config,
            inner: Mutex::new(StoreInner {
                session: None,
                loading: LoadingState::Initializing,
                live: true,
                cleared_at_ms: None,
                pump: None,
            }),
            watch_tx,
        })
    }

    /// Current state
    pub fn snapshot(&self) -> StoreSnapshot {
        self.watch_tx.borrow().clone()
    }

    /// Subscribe to state changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.watch_tx.subscribe()
    }

    /// One-shot initial fetch. On adapter error the store still settles
    /// at `Ready` with no session, so no consumer spins forever.
    pub async fn initialize(&self) -> SessionResult<()> {
        {
            let inner = self.inner.lock().expect("session store lock");
            if !inner.live {
                return Err(SessionError::StoreClosed);
            }
            if inner.loading.is_settled() {
                // Already settled (repeat call, or an event won the race).
                return Ok(());
            }
        }

        let fetched = self.backend.get_current_session().await;

        let mut inner = self.inner.lock().expect("session store lock");
        if !inner.live {
            tracing::debug!("Discarding initial session fetch after teardown");
            return Ok(());
        }
        if inner.loading.is_settled() {
            // A subscription event arrived while the fetch was in flight;
            // the event is newer, so the fetch result is dropped.
            return Ok(());
        }

        match fetched {
            Ok(session) => {
                tracing::info!(authenticated = session.is_some(), "Initial session check");
                inner.session = session;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Initial session fetch failed, continuing unauthenticated");
                inner.session = None;
            }
        }
        inner.loading = LoadingState::Ready;
        self.notify(&inner);

        Ok(())
    }

    /// Apply one subscription event, in delivery order. Last write wins
    /// for `session`; the store settles at `Ready`.
    pub fn apply_event(&self, event: SessionEvent) {
        let mut inner = self.inner.lock().expect("session store lock");
        if !inner.live {
            return;
        }

        if let Some(cleared_at_ms) = inner.cleared_at_ms {
            match &event.session {
                Some(session) if session.issued_at.timestamp_millis() <= cleared_at_ms => {
                    // Late event for the session we already signed out of.
                    tracing::debug!(event = event.event.as_str(), "Dropping stale session event");
                    return;
                }
                Some(_) => {
                    // A genuinely new session supersedes the sign-out marker.
                    inner.cleared_at_ms = None;
                }
                None => {}
            }
        }

        tracing::debug!(
            event = event.event.as_str(),
            authenticated = event.session.is_some(),
            "Auth state change"
        );

        if event.event == AuthEvent::SignedOut {
            inner.session = None;
        } else {
            inner.session = event.session;
        }
        inner.loading = LoadingState::Ready;
        self.notify(&inner);
    }

    /// Begin OAuth sign-in via the flow controller. Synchronous adapter
    /// failure reverts to `Ready` and surfaces the error; success leaves
    /// the store at `SigningIn` until the provider's event settles it.
    pub async fn sign_in(&self) -> SessionResult<AuthorizeRedirect> {
        self.begin_operation(LoadingState::SigningIn)?;

        let flow = SignInFlow::new(self.backend.clone(), self.config.clone());
        match flow.start().await {
            Ok(redirect) => Ok(redirect),
            Err(e) => {
                let mut inner = self.inner.lock().expect("session store lock");
                inner.loading = LoadingState::Ready;
                self.notify(&inner);
                Err(e)
            }
        }
    }

    /// Sign out. On success the session is cleared immediately rather
    /// than waiting for the `SIGNED_OUT` event; on success or failure
    /// the store finishes at `Ready`.
    pub async fn sign_out(&self) -> SessionResult<()> {
        self.begin_operation(LoadingState::SigningOut)?;

        let access_token = {
            let inner = self.inner.lock().expect("session store lock");
            inner.session.as_ref().map(|s| s.access_token.clone())
        };

        let result = match &access_token {
            Some(token) => self.backend.sign_out(token).await,
            // Nothing to invalidate at the provider.
            None => Ok(()),
        };

        let mut inner = self.inner.lock().expect("session store lock");
        match result {
            Ok(()) => {
                inner.session = None;
                inner.cleared_at_ms = Some(chrono::Utc::now().timestamp_millis());
                inner.loading = LoadingState::Ready;
                self.notify(&inner);
                tracing::info!("User signed out");
                Ok(())
            }
            Err(e) => {
                inner.loading = LoadingState::Ready;
                self.notify(&inner);
                tracing::warn!(error = %e, "Sign out failed, session may still be valid");
                Err(e)
            }
        }
    }

    /// Start pumping adapter events into the store. Safe to call once;
    /// repeat calls are no-ops while a pump is attached.
    pub fn spawn_event_pump(self: &Arc<Self>) {
        let mut inner = self.inner.lock().expect("session store lock");
        if !inner.live || inner.pump.is_some() {
            return;
        }

        let mut subscription = self.backend.subscribe();
        let store = Arc::clone(self);
        inner.pump = Some(tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                store.apply_event(event);
            }
            tracing::debug!("Auth event subscription closed");
        }));
    }

    /// Release the subscription exactly once. Idempotent; after
    /// teardown any still-in-flight results are discarded.
    pub fn teardown(&self) {
        let mut inner = self.inner.lock().expect("session store lock");
        inner.live = false;
        if let Some(pump) = inner.pump.take() {
            pump.abort();
            tracing::debug!("Auth listener unsubscribed");
        }
    }

    fn begin_operation(&self, next: LoadingState) -> SessionResult<()> {
        let mut inner = self.inner.lock().expect("session store lock");
        if !inner.live {
            return Err(SessionError::StoreClosed);
        }
        if !inner.loading.can_begin_operation() {
            return Err(SessionError::OperationInFlight);
        }
        inner.loading = next;
        self.notify(&inner);
        Ok(())
    }

    fn notify(&self, inner: &StoreInner) {
        self.watch_tx.send_replace(StoreSnapshot {
            session: inner.session.clone(),
            loading: inner.loading,
        });
    }
}

impl<B> Drop for SessionStore<B>
where
    B: AuthBackend + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
