//! Error types for the SDP enhancement library.

use std::fmt;

/// Errors that can occur around the enhancement engine.
///
/// The rewriting passes themselves never fail: malformed lines are passed
/// through untouched. Errors only arise at the edges:
///
/// - **Configuration**: [`InvalidProfile`](Self::InvalidProfile),
///   [`InvalidMode`](Self::InvalidMode) when parsing user-supplied tokens.
/// - **I/O**: [`Io`](Self::Io) when reading or writing offers from disk.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A codec profile token could not be used for selection.
    #[error("invalid codec profile: {reason}")]
    InvalidProfile { reason: ProfileErrorKind },

    /// Unknown enhance mode (expected `auto`, `always`/`true`/`on` or `off`/`false`).
    #[error("invalid enhance mode: {0:?}")]
    InvalidMode(String),
}

/// Specific kind of profile parse failure.
#[derive(Debug)]
pub enum ProfileErrorKind {
    /// Token was empty or only whitespace.
    Empty,
    /// Token contained embedded whitespace, so it can never match a single rtpmap field.
    ContainsWhitespace(String),
}

impl fmt::Display for ProfileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty token"),
            Self::ContainsWhitespace(token) => write!(f, "token {token:?} contains whitespace"),
        }
    }
}

/// Convenience alias for `Result<T, EnhanceError>`.
pub type Result<T> = std::result::Result<T, EnhanceError>;
