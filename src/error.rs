//! Error types for the archive merge engine.
//!
//! Every failure aborts the whole merge. Most variants map onto a pipeline
//! stage: reading a container or inflating one of its entries is decoding,
//! writing the merged container back out is encoding. A merge task that the
//! runtime drops before it finishes is reported separately.

use std::fmt;

/// Which of the two merge inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSlot {
    First,
    Second,
}

impl InputSlot {
    /// One-based position, as shown to users.
    pub fn number(self) -> usize {
        match self {
            InputSlot::First => 1,
            InputSlot::Second => 2,
        }
    }
}

impl fmt::Display for InputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSlot::First => write!(f, "first archive"),
            InputSlot::Second => write!(f, "second archive"),
        }
    }
}

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Encode,
    /// The merge never ran to completion on its worker.
    Scheduling,
}

/// Formats the optional input prefix of an error message.
struct InputPrefix<'a>(&'a Option<InputSlot>);

impl fmt::Display for InputPrefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(slot) => write!(f, "{}: ", slot),
            None => Ok(()),
        }
    }
}

/// Errors produced while decoding, merging or encoding archives.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bytes are not a well-formed ZIP container.
    #[error("{}invalid archive: {reason}", InputPrefix(.input))]
    InvalidArchive {
        input: Option<InputSlot>,
        reason: String,
    },

    /// An entry's payload could not be decompressed.
    #[error("{}cannot decompress '{path}': {reason}", InputPrefix(.input))]
    Decompression {
        input: Option<InputSlot>,
        path: String,
        reason: String,
    },

    /// The merged container could not be serialized.
    #[error("failed to encode merged archive: {0}")]
    Encoding(String),

    /// The blocking merge task was cancelled before producing a result.
    #[error("merge task was cancelled")]
    Cancelled,
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidArchive {
            input: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn decompression(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Decompression {
            input: None,
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn encoding(reason: impl Into<String>) -> Self {
        Error::Encoding(reason.into())
    }

    /// Tag a decode error with the input it came from.
    ///
    /// Encoding errors are not tied to an input and pass through unchanged.
    pub fn with_input(self, slot: InputSlot) -> Self {
        match self {
            Error::InvalidArchive { reason, .. } => Error::InvalidArchive {
                input: Some(slot),
                reason,
            },
            Error::Decompression { path, reason, .. } => Error::Decompression {
                input: Some(slot),
                path,
                reason,
            },
            other => other,
        }
    }

    /// The input this error refers to, if any.
    pub fn input(&self) -> Option<InputSlot> {
        match self {
            Error::InvalidArchive { input, .. } | Error::Decompression { input, .. } => *input,
            Error::Encoding(_) | Error::Cancelled => None,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Error::InvalidArchive { .. } | Error::Decompression { .. } => Stage::Decode,
            Error::Encoding(_) => Stage::Encode,
            Error::Cancelled => Stage::Scheduling,
        }
    }
}

/// Truncated reads while parsing records mean the container is malformed.
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::invalid(format!("truncated record ({})", err))
    }
}
