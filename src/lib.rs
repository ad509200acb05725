//! # new-reader
//!
//! Open standard input, files, HTTP(S) URLs, UDP sockets and multicast
//! groups as readable byte streams through one call.
//!
//! ## Overview
//!
//! | descriptor                | opens                                      |
//! |---------------------------|--------------------------------------------|
//! | `None` or `"-"`           | standard input                             |
//! | `"udp://@227.1.3.10:4310"`| multicast group, one datagram per `read`   |
//! | `"udp://1.2.3.4:5555"`    | UDP socket bound to that address, buffered |
//! | `"https://example.com/a"` | GET response body                          |
//! | anything else             | local file                                 |
//!
//! Prefixes are checked in that order. Nothing else is validated up front;
//! a bad path or URL fails with the error of the call that opens it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::io::Read;
//!
//! fn main() -> Result<(), new_reader::ReaderError> {
//!     let mut data = new_reader::reader(Some("udp://@227.1.3.10:4310"), &HashMap::new())?;
//!     let mut packet = [0u8; 1316];
//!     let n = data.read(&mut packet)?;
//!     println!("{n} bytes");
//!     data.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Sockets
//!
//! UDP and multicast sockets double their kernel receive buffer until the OS
//! stops accepting larger sizes (bounded by `UdpConfig::recv_buffer_ceiling`)
//! and enable address reuse. Multicast sockets use a TTL of 32 and time out
//! a read after 60 seconds without a datagram; unicast reads never time out.
//!
//! ## Features
//!
//! - `json`, `yaml`, `toml` - `ReaderConfig` loaders
//! - `async` - Tokio `AsyncRead` versions of every source
//! - `miette` - Pretty error reporting with miette

pub mod builder;
pub mod config;
pub mod error;
pub mod io;

#[cfg(feature = "async")]
pub mod builder_async;

use std::collections::HashMap;

pub use builder::ReaderBuilder;
pub use config::{HttpConfig, MulticastConfig, ReaderConfig, Source, UdpConfig};
pub use error::ReaderError;
pub use io::{
    ByteStream, DatagramReader, FileInput, HttpInput, InputProvider, MulticastInput,
    MulticastStream, SourceKind, StdinInput, UdpInput, UdpStream,
};

#[cfg(feature = "async")]
pub use io::{
    AsyncByteStream, AsyncDatagramReader, AsyncFileInput, AsyncHttpInput, AsyncHttpStream,
    AsyncInputProvider, AsyncMulticastInput, AsyncMulticastStream, AsyncStdinInput, AsyncUdpInput,
    AsyncUdpStream,
};

#[cfg(feature = "miette")]
pub use error::ReaderDiagnostic;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open `source` as a readable stream, sending `headers` on HTTP(S) requests.
///
/// Headers are ignored for every other source kind.
pub fn reader(
    source: Option<&str>,
    headers: &HashMap<String, String>,
) -> error::Result<Box<dyn ByteStream>> {
    ReaderBuilder::new().headers(headers).open(source)
}

/// Open `source` as a readable stream with default options.
pub fn open(source: Option<&str>) -> error::Result<Box<dyn ByteStream>> {
    ReaderBuilder::new().open(source)
}

/// Async counterpart of [`reader`].
#[cfg(feature = "async")]
pub async fn async_reader(
    source: Option<&str>,
    headers: &HashMap<String, String>,
) -> error::Result<Box<dyn AsyncByteStream>> {
    ReaderBuilder::new().headers(headers).open_async(source).await
}

/// Crate version as a string, e.g. `"0.1.3"`.
pub fn version() -> &'static str {
    VERSION
}

/// Crate version as an integer: major, minor and patch concatenated.
///
/// `0.1.3` gives `13`, `1.2.3` gives `123`.
pub fn version_number() -> u64 {
    version_number_of(VERSION)
}

fn version_number_of(version: &str) -> u64 {
    version
        .split(['.', '-', '+'])
        .take(3)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}
