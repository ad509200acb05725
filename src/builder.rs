//! Builder that resolves source descriptors and opens them.

use crate::config::{ReaderConfig, Source};
use crate::error::Result;
use crate::io::{
    ByteStream, FileInput, HttpInput, InputProvider, MulticastInput, StdinInput, UdpInput,
};

/// Resolves source descriptors into providers and opens them.
///
/// Headers added here are merged over `ReaderConfig::headers` and are only
/// sent on the HTTP(S) path.
#[derive(Debug, Clone, Default)]
pub struct ReaderBuilder {
    config: ReaderConfig,
}

impl ReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config
            .headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Classify `source` and build the provider that opens it.
    pub fn resolve(&self, source: Option<&str>) -> Result<Box<dyn InputProvider>> {
        let source = Source::parse(source)?;
        Ok(self.provider_for(source))
    }

    pub fn provider_for(&self, source: Source) -> Box<dyn InputProvider> {
        match source {
            Source::Stdin => Box::new(StdinInput::new()),
            Source::File(path) => Box::new(FileInput::new(path)),
            Source::Http(url) => Box::new(
                HttpInput::new(url)
                    .with_headers(self.config.headers.clone())
                    .with_config(self.config.http.clone()),
            ),
            Source::Udp { host, port } => {
                Box::new(UdpInput::new(host, port).with_config(self.config.udp.clone()))
            }
            Source::Multicast { group, port } => Box::new(
                MulticastInput::new(group, port)
                    .with_config(self.config.udp.clone(), self.config.multicast.clone()),
            ),
        }
    }

    /// Open `source` as a readable stream.
    ///
    /// `None` and `"-"` return stdin without touching any file or socket.
    pub fn open(&self, source: Option<&str>) -> Result<Box<dyn ByteStream>> {
        let provider = self.resolve(source)?;
        tracing::debug!(kind = %provider.kind(), source = provider.id(), "opening source");
        provider.open()
    }
}
