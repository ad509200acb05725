//! Standard input and file sources.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use super::{ByteStream, InputProvider, SourceKind};
use crate::error::Result;

/// Input provider for reading from stdin.
#[derive(Debug, Clone)]
pub struct StdinInput {
    id: String,
}

impl StdinInput {
    /// Create a new stdin input provider.
    pub fn new() -> Self {
        Self { id: "-".into() }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProvider for StdinInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Stdin
    }

    fn open(&self) -> Result<Box<dyn ByteStream>> {
        Ok(Box::new(io::stdin()))
    }
}

impl ByteStream for io::Stdin {
    fn kind(&self) -> SourceKind {
        SourceKind::Stdin
    }
}

/// Input provider for reading from files.
#[derive(Debug, Clone)]
pub struct FileInput {
    id: String,
    path: PathBuf,
}

impl FileInput {
    /// Create a new file input provider.
    pub fn new(path: PathBuf) -> Self {
        let id = path.to_string_lossy().into_owned();
        Self { id, path }
    }

    /// Get the file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl InputProvider for FileInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn open(&self) -> Result<Box<dyn ByteStream>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }
}

impl ByteStream for File {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }
}
