//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::ReaderError;

/// A diagnostic wrapper for reader errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct ReaderDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error
    pub source: Option<ReaderError>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    pub severity: Severity,
}

fn help_for(e: &ReaderError) -> Option<String> {
    let text = match e {
        ReaderError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            "Check the file path, or prefix network sources with http://, udp:// or udp://@"
        }
        ReaderError::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            "No datagram arrived before the read timeout; is the multicast feed running?"
        }
        ReaderError::Io(io) if io.kind() == std::io::ErrorKind::AddrInUse => {
            "Another process holds this address without SO_REUSEADDR"
        }
        ReaderError::Io(_) => return None,
        ReaderError::Http(_) => "Check the URL, network access and request headers",
        ReaderError::InvalidSource { .. } => "Expected udp://<host>:<port> or udp://@<group>:<port>",
        ReaderError::InvalidPort { .. } => "The port must be a number between 0 and 65535",
        ReaderError::InvalidGroup { .. } => "The multicast group must be an IPv4 literal such as 239.1.1.1",
        ReaderError::Config(_) => "Check the configuration document against ReaderConfig",
    };
    Some(text.into())
}

impl From<ReaderError> for ReaderDiagnostic {
    fn from(e: ReaderError) -> Self {
        ReaderDiagnostic {
            message: format!("failed to open source: {e}"),
            help: help_for(&e),
            source: Some(e),
            severity: Severity::Error,
        }
    }
}

impl From<ReaderError> for miette::Report {
    fn from(e: ReaderError) -> Self {
        miette::Report::new(ReaderDiagnostic::from(e))
    }
}
