//! Session manager: the signed-in identity and its credential token.
//!
//! ARCHITECTURE
//! ============
//! One `SessionManager` per running client, built at the composition root
//! and handed to views. It is the only writer of the session and of the
//! durable token. Views read [`SessionSnapshot`]s (directly or through a
//! `watch` subscription) and call `login`, `register` and `logout`.
//!
//! States: `Initializing` until [`SessionManager::restore`] finishes once,
//! then `Anonymous` or `Authenticated`. A 401 seen by the API client moves an
//! authenticated session back to `Anonymous`.
//!
//! ORDERING
//! ========
//! Every mutating operation takes the next value of a sequence counter when
//! it starts. An async operation commits its result only if the counter has
//! not moved since, so the most recent user intent wins: a slow login that
//! resolves after a logout is discarded with [`SessionError::Superseded`].
//!
//! Restoration is the exception: it yields only to operations that committed
//! (a sign-in, a sign-out, an invalidation). A login that failed while the
//! `/auth/me` lookup was in flight changed nothing, so the lookup result still
//! applies and the token never outlives its identity.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::api::{ApiCall, ApiClient, SessionInvalidated};
use crate::error::SessionError;
use crate::storage::TokenStore;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, UserIdentity};

pub const ME_PATH: &str = "/auth/me";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";

// =============================================================================
// READ MODEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Anonymous,
    Authenticated,
}

/// Read-only view of the session published to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Present iff signed in.
    pub current_user: Option<UserIdentity>,
    /// True until startup restoration has finished. Views should hold off on
    /// "not signed in" decisions while this is set.
    pub is_initializing: bool,
    /// True while a login or register request is in flight.
    pub busy: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self { current_user: None, is_initializing: true, busy: false }
    }
}

impl SessionSnapshot {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.current_user.is_some() {
            SessionPhase::Authenticated
        } else if self.is_initializing {
            SessionPhase::Initializing
        } else {
            SessionPhase::Anonymous
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

// =============================================================================
// STATE
// =============================================================================

struct SessionState {
    user: Option<UserIdentity>,
    token: Option<String>,
    initializing: bool,
    restore_started: bool,
    in_flight: u32,
    /// Bumped when a session operation starts; the newest attempt wins.
    seq: u64,
    /// Bumped when the session actually changes hands (sign-in, sign-out,
    /// invalidation). A failed attempt leaves it alone.
    commits: u64,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_user: self.user.clone(),
            is_initializing: self.initializing,
            busy: self.in_flight > 0,
        }
    }
}

struct Shared {
    state: Mutex<SessionState>,
    tokens: Arc<dyn TokenStore>,
    publisher: watch::Sender<SessionSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Notify subscribers if the visible snapshot changed.
    fn publish(&self, state: &SessionState) {
        let next = state.snapshot();
        self.publisher.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Drop identity and token, in memory and on disk.
    fn clear(&self, state: &mut SessionState) {
        if let Err(err) = self.tokens.clear() {
            tracing::warn!(error = %err, "failed to remove stored credential");
        }
        state.user = None;
        state.token = None;
    }

    fn invalidate(&self, event: &SessionInvalidated) {
        let mut state = self.lock();
        state.seq += 1;
        state.commits += 1;
        let was_signed_in = state.user.is_some();
        self.clear(&mut state);
        self.publish(&state);
        if was_signed_in {
            tracing::warn!(method = %event.method, path = %event.path, "session invalidated by server");
        }
    }
}

// =============================================================================
// MANAGER
// =============================================================================

/// Owner of the session. Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionManager {
    client: ApiClient,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Build an empty, initializing session over `client` and subscribe to
    /// its 401 events. Call [`SessionManager::restore`] once afterwards.
    pub fn new(client: ApiClient) -> Self {
        let state = SessionState {
            user: None,
            token: None,
            initializing: true,
            restore_started: false,
            in_flight: 0,
            seq: 0,
            commits: 0,
        };
        let (publisher, _) = watch::channel(state.snapshot());
        let shared = Arc::new(Shared { state: Mutex::new(state), tokens: client.token_store(), publisher });

        let weak = Arc::downgrade(&shared);
        client.on_unauthorized(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.invalidate(event);
            }
        });

        Self { client, shared }
    }

    /// The gateway this session authenticates. Views use it for domain calls.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().snapshot()
    }

    /// Receiver that wakes whenever the snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.publisher.subscribe()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<UserIdentity> {
        self.shared.lock().user.clone()
    }

    /// In-memory copy of the credential token.
    #[must_use]
    pub fn credential_token(&self) -> Option<String> {
        self.shared.lock().token.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.snapshot().phase()
    }

    /// Resolve the stored credential into an identity. Runs once; later calls
    /// return immediately.
    ///
    /// Failures are silent: a rejected or unreachable identity lookup removes
    /// the stored token and leaves the session anonymous. Initialization ends
    /// either way.
    pub async fn restore(&self) {
        let (commits, has_token) = {
            let mut state = self.shared.lock();
            if state.restore_started {
                return;
            }
            state.restore_started = true;
            state.token = self.shared.tokens.load();
            (state.commits, state.token.is_some())
        };

        if !has_token {
            let mut state = self.shared.lock();
            state.initializing = false;
            self.shared.publish(&state);
            tracing::debug!("no stored credential; starting anonymous");
            return;
        }

        let outcome = self
            .client
            .fetch::<UserIdentity>(ApiCall::get(ME_PATH).quiet_unauthorized())
            .await;

        let mut state = self.shared.lock();
        state.initializing = false;
        if state.commits == commits {
            match outcome {
                Ok(user) => {
                    tracing::info!(username = %user.username, "session restored");
                    state.user = Some(user);
                }
                Err(err) => {
                    tracing::info!(error = %err, "stored credential not accepted; starting anonymous");
                    self.shared.clear(&mut state);
                }
            }
        } else {
            tracing::debug!("restore result discarded; the session changed hands meanwhile");
        }
        self.shared.publish(&state);
    }

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Api`] if the server rejects the credentials or is
    ///   unreachable. The session is left as it was.
    /// - [`SessionError::Storage`] if the token cannot be persisted.
    /// - [`SessionError::Superseded`] if a newer session operation ran while
    ///   this one was in flight.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, SessionError> {
        let call = ApiCall::post(LOGIN_PATH).json(&LoginRequest { email, password })?;
        self.authenticate(call).await
    }

    /// Create an account and sign in with it. Confirm-password checks belong
    /// to the caller.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::login`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserIdentity, SessionError> {
        let call = ApiCall::post(REGISTER_PATH).json(&RegisterRequest { username, email, password })?;
        self.authenticate(call).await
    }

    /// Sign out. Clears the stored token and the identity unconditionally.
    pub fn logout(&self) {
        let mut state = self.shared.lock();
        state.seq += 1;
        state.commits += 1;
        let was_signed_in = state.user.is_some();
        self.shared.clear(&mut state);
        self.shared.publish(&state);
        if was_signed_in {
            tracing::info!("signed out");
        }
    }

    async fn authenticate(&self, call: ApiCall) -> Result<UserIdentity, SessionError> {
        let path = call.path().to_owned();
        let seq = {
            let mut state = self.shared.lock();
            state.seq += 1;
            state.in_flight += 1;
            self.shared.publish(&state);
            state.seq
        };

        let outcome = self.client.fetch::<AuthResponse>(call.quiet_unauthorized()).await;

        let mut state = self.shared.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        let result = match outcome {
            Err(err) => {
                tracing::info!(path = %path, error = %err, "credential exchange failed");
                Err(SessionError::Api(err))
            }
            Ok(_) if state.seq != seq => {
                tracing::info!(path = %path, "credential exchange superseded; result discarded");
                Err(SessionError::Superseded)
            }
            Ok(auth) => match self.shared.tokens.save(&auth.token) {
                Ok(()) => {
                    tracing::info!(path = %path, username = %auth.user.username, "signed in");
                    state.commits += 1;
                    state.token = Some(auth.token);
                    state.user = Some(auth.user.clone());
                    Ok(auth.user)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to persist credential");
                    Err(SessionError::Storage(err))
                }
            },
        };
        self.shared.publish(&state);
        result
    }
}
