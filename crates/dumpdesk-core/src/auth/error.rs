use thiserror::Error;

use super::token::DecodeError;

/// Reasons a token does not yield a console session.
///
/// The session manager collapses all of these into "invalid session"; the
/// distinction only shows up in operator logs.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("token could not be decoded: {0}")]
    Decode(#[from] DecodeError),

    #[error("token expired at {exp}")]
    Expired { exp: i64 },

    #[error("role {role:?} is not allowed to use the console")]
    Forbidden { role: Option<String> },
}
