//! Configuration types for opening sources.
//!
//! This module provides:
//! - `Source`: A parsed source descriptor (stdin, file, http, udp, multicast)
//! - `ReaderConfig`: Options applied when a source is opened
//! - `HttpConfig`, `UdpConfig`, `MulticastConfig`: Per-transport options

mod options;
mod source;

pub use options::{
    DEFAULT_MULTICAST_READ_TIMEOUT_SECS, DEFAULT_MULTICAST_TTL, DEFAULT_RECV_BUFFER_CEILING,
    HttpConfig, MulticastConfig, ReaderConfig, UdpConfig,
};
pub use source::{MULTICAST_PREFIX, STDIN_MARKER, Source, UDP_PREFIX};
