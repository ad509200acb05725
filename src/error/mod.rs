//! Error types for opening and reading sources.
//!
//! Underlying failures are wrapped, never translated: a missing file is still
//! an `io::ErrorKind::NotFound`, a stalled multicast feed is still an
//! `io::ErrorKind::TimedOut`, and HTTP failures carry the client's own error.

use std::io;
use std::net::AddrParseError;
use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    /// File, stdin and socket failures (open, bind, membership, read timeout)
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Request construction, connection, DNS or status failures
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The descriptor matched a URI prefix but its authority is unusable
    #[error("invalid source '{source_uri}': {reason}")]
    InvalidSource { source_uri: String, reason: String },

    #[error("invalid port in '{source_uri}'")]
    InvalidPort {
        source_uri: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid multicast group in '{source_uri}'")]
    InvalidGroup {
        source_uri: String,
        #[source]
        source: AddrParseError,
    },

    /// A configuration document could not be deserialized
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ReaderError {
    pub(crate) fn invalid_source(source_uri: &str, reason: impl Into<String>) -> Self {
        ReaderError::InvalidSource {
            source_uri: source_uri.to_string(),
            reason: reason.into(),
        }
    }

    /// The `io::ErrorKind` behind this error, if it came from an I/O call.
    pub fn kind(&self) -> Option<io::ErrorKind> {
        match self {
            ReaderError::Io(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// True when a read or request gave up waiting.
    pub fn is_timeout(&self) -> bool {
        match self {
            ReaderError::Io(e) => e.kind() == io::ErrorKind::TimedOut,
            ReaderError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// True when a local file does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(io::ErrorKind::NotFound)
    }
}

pub type Result<T, E = ReaderError> = std::result::Result<T, E>;

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
