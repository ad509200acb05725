//! Async standard input and file sources.

use std::path::PathBuf;

use async_trait::async_trait;
use super::{AsyncByteStream, AsyncInputProvider, SourceKind};
use crate::error::Result;

/// Async input provider for reading from stdin.
#[derive(Debug, Clone)]
pub struct AsyncStdinInput {
    id: String,
}

impl AsyncStdinInput {
    /// Create a new async stdin input provider.
    pub fn new() -> Self {
        Self { id: "-".into() }
    }
}

impl Default for AsyncStdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AsyncInputProvider for AsyncStdinInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Stdin
    }

    async fn open(&self) -> Result<Box<dyn AsyncByteStream>> {
        Ok(Box::new(tokio::io::stdin()))
    }
}

/// Async input provider for reading from files.
#[derive(Debug, Clone)]
pub struct AsyncFileInput {
    id: String,
    path: PathBuf,
}

impl AsyncFileInput {
    /// Create a new async file input provider.
    pub fn new(path: PathBuf) -> Self {
        let id = path.to_string_lossy().into_owned();
        Self { id, path }
    }

    /// Get the file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl AsyncInputProvider for AsyncFileInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    async fn open(&self) -> Result<Box<dyn AsyncByteStream>> {
        let file = tokio::fs::File::open(&self.path).await?;
        Ok(Box::new(file))
    }
}

impl AsyncByteStream for tokio::io::Stdin {
    fn kind(&self) -> SourceKind {
        SourceKind::Stdin
    }
}

impl AsyncByteStream for tokio::fs::File {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }
}
