//! Unified error type.

use std::fmt;

/// The error type returned by taskdeck's fallible operations.
///
/// Application-level outcomes are not errors: a rejected request is a
/// [`Response`](crate::Response), a failed inline save is a
/// [`SaveOutcome`](crate::inline_edit::SaveOutcome), and flag resolution
/// cannot fail at all. This type surfaces infrastructure failures: binding to
/// a port, accepting a connection, or a configuration value that does not
/// parse.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Config { key: &'static str, reason: String },
}

impl Error {
    pub(crate) fn config(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Config { key, reason: reason.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Config { key, reason } => write!(f, "config: {key}: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
