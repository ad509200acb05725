//! Async input provider and stream trait definitions.

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::SourceKind;
use crate::error::Result;

/// An open, async readable byte stream.
///
/// Mirrors `ByteStream`: dropping the handle releases it, `close` reports
/// errors from any teardown the transport needs.
pub trait AsyncByteStream: AsyncRead + Unpin + Send + Debug {
    fn kind(&self) -> SourceKind;

    fn close(self: Box<Self>) -> std::io::Result<()> {
        Ok(())
    }
}

/// Trait for asynchronous input providers.
#[async_trait]
pub trait AsyncInputProvider: Send + Sync + Debug {
    /// Returns the descriptor this provider was resolved from.
    fn id(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Open and return a new async readable stream.
    async fn open(&self) -> Result<Box<dyn AsyncByteStream>>;
}
