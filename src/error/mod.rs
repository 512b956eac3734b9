//! Error types for teestream.
//!
//! [`ReplicaError`] travels through `std::io::Read` chains as the payload of an
//! [`io::Error`], so a sink failure deep inside a chain of duplicators reaches
//! the caller intact. Converting the `io::Error` back with `ReplicaError::from`
//! recovers the original variant.

use std::borrow::Cow;
use std::io;

use thiserror::Error;

/// Errors that can occur while replicating or tokenizing a stream.
#[derive(Debug, Error)]
pub enum ReplicaError {
    /// The upstream source failed to produce the next chunk.
    #[error("source read failed: {0}")]
    SourceRead(#[source] io::Error),

    /// A sink rejected a chunk or accepted only part of it.
    #[error("sink {sink} write failed: {source}")]
    SinkWrite {
        /// Position of the failing sink in its chain (0 is nearest the source).
        sink: usize,
        /// The underlying cause; short writes carry [`io::ErrorKind::WriteZero`].
        #[source]
        source: io::Error,
    },

    /// The scan buffer reached its limit without completing a token.
    #[error("token too large: {size} bytes (max {max})")]
    TokenTooLarge {
        /// Bytes buffered when the limit was hit.
        size: usize,
        /// The configured maximum token size.
        max: usize,
    },

    /// The split function rejected its input.
    #[error("split function error: {0}")]
    Split(#[from] SplitError),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

/// Errors reported by a split function, or by the scanner about one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// The input is malformed for this split policy.
    #[error("malformed input: {message}")]
    Malformed {
        /// What was wrong with the input.
        message: Cow<'static, str>,
    },

    /// The split function consumed or referenced bytes past the buffer end.
    #[error("split function went out of range: {end} > {len} buffered bytes")]
    OutOfRange {
        /// Offending end position.
        end: usize,
        /// Bytes actually buffered.
        len: usize,
    },

    /// Too many empty tokens in a row without consuming input.
    #[error("split function made no progress after {0} empty tokens")]
    NoProgress(usize),
}

impl SplitError {
    /// Creates a [`SplitError::Malformed`] with the given message.
    pub fn malformed(message: impl Into<Cow<'static, str>>) -> Self {
        SplitError::Malformed {
            message: message.into(),
        }
    }
}

impl ReplicaError {
    /// Builds a [`ReplicaError::SinkWrite`] for a sink that took `written` of
    /// `expected` bytes.
    pub(crate) fn short_write(sink: usize, written: usize, expected: usize) -> Self {
        ReplicaError::SinkWrite {
            sink,
            source: io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {written} of {expected} bytes"),
            ),
        }
    }

    /// Returns true for [`ReplicaError::SinkWrite`].
    pub fn is_sink_failure(&self) -> bool {
        matches!(self, ReplicaError::SinkWrite { .. })
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            ReplicaError::SourceRead(e) => e.kind(),
            // Interrupted would tell std read loops to retry and skip the chunk
            ReplicaError::SinkWrite { source, .. } => match source.kind() {
                io::ErrorKind::Interrupted => io::ErrorKind::Other,
                kind => kind,
            },
            ReplicaError::TokenTooLarge { .. } | ReplicaError::Split(_) => {
                io::ErrorKind::InvalidData
            }
            ReplicaError::InvalidConfig { .. } => io::ErrorKind::InvalidInput,
        }
    }
}

impl From<ReplicaError> for io::Error {
    fn from(e: ReplicaError) -> Self {
        match e {
            ReplicaError::SourceRead(inner) => inner,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}

impl From<io::Error> for ReplicaError {
    fn from(e: io::Error) -> Self {
        if !e.get_ref().is_some_and(|inner| inner.is::<ReplicaError>()) {
            return ReplicaError::SourceRead(e);
        }
        let kind = e.kind();
        match e.into_inner().map(|inner| inner.downcast::<ReplicaError>()) {
            Some(Ok(err)) => *err,
            Some(Err(other)) => ReplicaError::SourceRead(io::Error::new(kind, other)),
            None => ReplicaError::SourceRead(io::Error::from(kind)),
        }
    }
}
