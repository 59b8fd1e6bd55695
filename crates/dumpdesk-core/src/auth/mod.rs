//! Authentication and session lifecycle.
//!
//! This module provides:
//! - `token`: bearer token decoding into `Claims`
//! - `store`: persistence of the session across restarts
//! - `manager`: the `SessionManager` state machine with timer-driven expiry
//!
//! Only tokens whose role claim is `"Admin"` open a session.

pub mod clock;
pub mod error;
pub mod manager;
pub mod store;
pub mod token;

pub use clock::{Clock, SystemClock};
pub use error::SessionError;
pub use manager::{SessionManager, SessionStatus, ROOT_PATH};
pub use store::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore};
pub use token::{decode, Claims, DecodeError, JwtDecoder, TokenDecoder, ADMIN_ROLE};

/// Redirect primitive the session manager calls when a session ends.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Error,
}

/// Fire-and-forget user notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotifyLevel);
}
