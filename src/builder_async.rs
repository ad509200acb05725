//! Async resolution and opening of source descriptors.

use crate::builder::ReaderBuilder;
use crate::config::Source;
use crate::error::Result;
use crate::io::{
    AsyncByteStream, AsyncFileInput, AsyncHttpInput, AsyncInputProvider, AsyncMulticastInput,
    AsyncStdinInput, AsyncUdpInput, MulticastInput, UdpInput,
};

impl ReaderBuilder {
    /// Classify `source` and build the async provider that opens it.
    pub fn resolve_async(&self, source: Option<&str>) -> Result<Box<dyn AsyncInputProvider>> {
        let config = self.config();
        let provider: Box<dyn AsyncInputProvider> = match Source::parse(source)? {
            Source::Stdin => Box::new(AsyncStdinInput::new()),
            Source::File(path) => Box::new(AsyncFileInput::new(path)),
            Source::Http(url) => Box::new(
                AsyncHttpInput::new(url)
                    .with_headers(config.headers.clone())
                    .with_config(config.http.clone()),
            ),
            Source::Udp { host, port } => Box::new(AsyncUdpInput::new(
                UdpInput::new(host, port).with_config(config.udp.clone()),
            )),
            Source::Multicast { group, port } => Box::new(AsyncMulticastInput::new(
                MulticastInput::new(group, port)
                    .with_config(config.udp.clone(), config.multicast.clone()),
            )),
        };
        Ok(provider)
    }

    /// Open `source` as an async readable stream.
    pub async fn open_async(&self, source: Option<&str>) -> Result<Box<dyn AsyncByteStream>> {
        let provider = self.resolve_async(source)?;
        tracing::debug!(kind = %provider.kind(), source = provider.id(), "opening source");
        provider.open().await
    }
}
