//! Input provider and stream trait definitions.

use std::fmt::{self, Debug};
use std::io::Read;

use crate::error::Result;

/// The transport behind a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Stdin,
    File,
    Http,
    Udp,
    Multicast,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Stdin => write!(f, "stdin"),
            SourceKind::File => write!(f, "file"),
            SourceKind::Http => write!(f, "http"),
            SourceKind::Udp => write!(f, "udp"),
            SourceKind::Multicast => write!(f, "multicast"),
        }
    }
}

/// An open, readable byte stream.
///
/// Dropping the handle releases it. `close` does the same but reports
/// errors from any teardown the transport needs.
pub trait ByteStream: Read + Send + Debug {
    fn kind(&self) -> SourceKind;

    fn close(self: Box<Self>) -> std::io::Result<()> {
        Ok(())
    }
}

/// Trait for synchronous input providers.
///
/// Implementors open a readable stream from one kind of source.
pub trait InputProvider: Send + Sync + Debug {
    /// Returns the descriptor this provider was resolved from.
    ///
    /// This is used for error messages and logging.
    /// Convention: "-" for stdin, file path for files, the URI otherwise.
    fn id(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Open and return a new readable stream.
    ///
    /// Each call returns an independent handle owned by the caller.
    fn open(&self) -> Result<Box<dyn ByteStream>>;
}
