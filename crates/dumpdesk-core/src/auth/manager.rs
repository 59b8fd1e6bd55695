//! The session lifecycle manager.
//!
//! Owns the console's single authentication state and moves it between
//! `Unknown`, `Authenticated` and `Unauthenticated`:
//!
//! ```text
//!            restore() ok                     set_token(valid)
//! [Unknown] ─────────────→ [Authenticated] ←──────────────────┐
//!     │                        │    │                          │
//!     │ restore() no/bad token │    │ expiry timer / logout()  │
//!     ▼                        │    ▼                          │
//! [Unauthenticated] ←──────────┘  [Unauthenticated] ───────────┘
//! ```
//!
//! `Unknown` only exists until [`SessionManager::restore`] runs.
//!
//! Every transition that installs or removes a token bumps a generation
//! counter and aborts the pending expiry task. The expiry task captures the
//! generation it was armed with and does nothing if that generation is no
//! longer current, so an old timer can never clear a newer session.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::store::{PersistedSession, SessionStore};
use super::token::{Claims, TokenDecoder};
use super::{Navigator, SessionError};

/// Path the console returns to whenever a session ends.
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Startup, before the persisted session has been checked.
    Unknown,
    Authenticated,
    Unauthenticated,
}

struct State {
    status: SessionStatus,
    token: Option<String>,
    claims: Option<Claims>,
    generation: u64,
    expiry: Option<JoinHandle<()>>,
}

struct Shared {
    store: Arc<dyn SessionStore>,
    decoder: Arc<dyn TokenDecoder>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    state: Mutex<State>,
    status_tx: watch::Sender<SessionStatus>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = state.expiry.take() {
            handle.abort();
        }
    }
}

/// Handle to the console session. Clones share the same state.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        decoder: Arc<dyn TokenDecoder>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Unknown);
        Self {
            shared: Arc::new(Shared {
                store,
                decoder,
                navigator,
                clock,
                state: Mutex::new(State {
                    status: SessionStatus::Unknown,
                    token: None,
                    claims: None,
                    generation: 0,
                    expiry: None,
                }),
                status_tx,
            }),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Leave `Unknown` by checking the persisted session.
    ///
    /// Must be called from within a tokio runtime so the expiry timer can be
    /// armed. Calling it a second time is ignored.
    pub fn restore(&self) {
        let (stored, unreadable) = match self.shared.store.load() {
            Ok(stored) => (stored, false),
            Err(e) => {
                warn!(error = %e, "Failed to load persisted session");
                (PersistedSession::default(), true)
            }
        };

        let mut state = self.lock();
        if state.status != SessionStatus::Unknown {
            warn!(status = ?state.status, "Session already restored, ignoring");
            return;
        }

        // An unreadable record would fail the same way on every launch
        let leftover = unreadable || !stored.is_empty();
        let Some(token) = stored.token else {
            if leftover {
                // Username/role without a token is a leftover; drop it
                self.clear_store();
            }
            debug!("No persisted session");
            self.reset(&mut state);
            return;
        };

        match self.validate(&token) {
            Ok(claims) => {
                info!(username = ?claims.username, "Restored persisted session");
                self.install(&mut state, token, claims, false);
            }
            Err(e) => {
                warn!(error = %e, "Persisted token rejected");
                self.reset(&mut state);
                self.clear_store();
                drop(state);
                self.shared.navigator.navigate_to(ROOT_PATH);
            }
        }
    }

    /// Install a new token, or clear the session with `None`.
    ///
    /// Never fails: an invalid token ends the session and sends the user back
    /// to the root path.
    pub fn set_token(&self, token: Option<&str>) {
        let Some(token) = token else {
            let mut state = self.lock();
            self.reset(&mut state);
            self.clear_store();
            debug!("Session cleared");
            return;
        };

        match self.validate(token) {
            Ok(claims) => {
                info!(username = ?claims.username, exp = claims.exp, "Session started");
                let mut state = self.lock();
                self.install(&mut state, token.to_string(), claims, true);
            }
            Err(e) => {
                warn!(error = %e, "Token rejected");
                let mut state = self.lock();
                self.reset(&mut state);
                self.clear_store();
                drop(state);
                self.shared.navigator.navigate_to(ROOT_PATH);
            }
        }
    }

    /// End the session and go back to the root path.
    pub fn logout(&self) {
        let mut state = self.lock();
        self.reset(&mut state);
        self.clear_store();
        drop(state);
        info!("Logged out");
        self.shared.navigator.navigate_to(ROOT_PATH);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// `None` while the persisted session has not been checked yet.
    ///
    /// When authenticated, the token is decoded again against the current
    /// clock, so a session past its expiry reads as `false` even if the
    /// timer has not fired yet.
    pub fn is_authenticated(&self) -> Option<bool> {
        let state = self.lock();
        match state.status {
            SessionStatus::Unknown => None,
            SessionStatus::Unauthenticated => Some(false),
            SessionStatus::Authenticated => {
                let valid = match state.token.as_deref().map(|t| self.validate(t)) {
                    Some(Ok(_)) => true,
                    Some(Err(e)) => {
                        debug!(error = %e, "Authenticated token no longer valid");
                        false
                    }
                    None => false,
                };
                Some(valid)
            }
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    /// Watch status changes (for the route guard).
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.shared.status_tx.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.lock().claims.as_ref().and_then(|c| c.username.clone())
    }

    pub fn role(&self) -> Option<String> {
        self.lock().claims.as_ref().and_then(|c| c.role.clone())
    }

    /// Whole minutes until the current token expires (for display).
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        let now = self.shared.clock.now_ms();
        self.lock()
            .claims
            .as_ref()
            .map(|c| (c.expires_at_ms() - now).max(0) / 60_000)
    }

    /// True while an expiry timer is armed and has not run.
    pub fn has_pending_expiry(&self) -> bool {
        self.lock()
            .expiry
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn validate(&self, token: &str) -> Result<Claims, SessionError> {
        let claims = self.shared.decoder.decode(token)?;
        claims.validate(self.shared.clock.now_ms())?;
        Ok(claims)
    }

    /// Abort the pending timer and invalidate any copy of it already woken.
    fn cancel_expiry(&self, state: &mut State) {
        state.generation = state.generation.wrapping_add(1);
        if let Some(handle) = state.expiry.take() {
            handle.abort();
        }
    }

    fn install(&self, state: &mut State, token: String, claims: Claims, persist: bool) {
        self.cancel_expiry(state);

        if persist {
            let persisted = PersistedSession {
                token: Some(token.clone()),
                username: claims.username.clone(),
                role: claims.role.clone(),
            };
            if let Err(e) = self.shared.store.save(&persisted) {
                warn!(error = %e, "Failed to persist session");
            }
        }

        let delay_ms = claims.remaining_ms(self.shared.clock.now_ms());
        state.expiry = self.arm_expiry(state.generation, delay_ms);
        state.token = Some(token);
        state.claims = Some(claims);
        self.set_status(state, SessionStatus::Authenticated);
    }

    fn reset(&self, state: &mut State) {
        self.cancel_expiry(state);
        state.token = None;
        state.claims = None;
        self.set_status(state, SessionStatus::Unauthenticated);
    }

    fn set_status(&self, state: &mut State, status: SessionStatus) {
        state.status = status;
        self.shared.status_tx.send_replace(status);
    }

    fn clear_store(&self) {
        if let Err(e) = self.shared.store.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    fn arm_expiry(&self, generation: u64, delay_ms: u64) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, session expiry will only be seen on the next check");
            return None;
        };

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        // Deadline is fixed now, not when the task is first polled
        let deadline = tokio::time::Instant::now() + Duration::from_millis(delay_ms);
        debug!(generation, delay_ms, "Arming session expiry timer");
        Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(shared) = weak.upgrade() {
                SessionManager { shared }.expire(generation);
            }
        }))
    }

    fn expire(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation || state.status != SessionStatus::Authenticated {
            debug!(generation, current = state.generation, "Stale expiry timer ignored");
            return;
        }

        // This task is the one finishing; nothing to abort
        state.expiry = None;
        self.reset(&mut state);
        self.clear_store();
        drop(state);
        info!("Session expired");
        self.shared.navigator.navigate_to(ROOT_PATH);
    }
}
