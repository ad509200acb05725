//! Options applied when a source is opened.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Deserialize;

/// Receive buffers stop growing once doubling would pass this many bytes.
pub const DEFAULT_RECV_BUFFER_CEILING: usize = 90_000_000;
/// Hop limit for multicast sockets.
pub const DEFAULT_MULTICAST_TTL: u32 = 32;
/// Seconds a multicast read waits for a datagram.
pub const DEFAULT_MULTICAST_READ_TIMEOUT_SECS: f64 = 60.0;
/// Largest UDP payload over IPv4.
const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Configuration for opening sources.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Headers sent with every HTTP(S) request
    pub headers: BTreeMap<String, String>,
    pub http: HttpConfig,
    pub udp: UdpConfig,
    pub multicast: MulticastConfig,
}

/// HTTP client options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Sent unless the caller supplies its own `User-Agent` header
    pub user_agent: String,
    /// Whole-request timeout; `None` leaves the client default (no timeout)
    pub timeout_secs: Option<u64>,
}

/// Socket options shared by unicast and multicast sources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UdpConfig {
    /// Largest receive-buffer size requested, in bytes. The size the kernel
    /// reports back may exceed it (Linux doubles the stored value).
    pub recv_buffer_ceiling: usize,
    /// Also set SO_REUSEPORT where the platform has it
    pub reuse_port: bool,
    /// Capacity of the buffered reader wrapped around unicast sockets
    pub stream_buffer_capacity: usize,
}

/// Multicast membership options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MulticastConfig {
    pub ttl: u32,
    /// `None` blocks forever, like a unicast socket
    pub read_timeout_secs: Option<f64>,
    /// Local interface used to join the group
    pub interface: Ipv4Addr,
    /// Bind to the group address instead of the wildcard address
    pub bind_group: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            recv_buffer_ceiling: DEFAULT_RECV_BUFFER_CEILING,
            reuse_port: true,
            stream_buffer_capacity: MAX_DATAGRAM_SIZE + 1,
        }
    }
}

impl UdpConfig {
    /// Buffered-reader capacity, never below one full datagram.
    pub fn stream_capacity(&self) -> usize {
        self.stream_buffer_capacity.max(MAX_DATAGRAM_SIZE)
    }
}

impl Default for MulticastConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_MULTICAST_TTL,
            read_timeout_secs: Some(DEFAULT_MULTICAST_READ_TIMEOUT_SECS),
            interface: Ipv4Addr::UNSPECIFIED,
            bind_group: false,
        }
    }
}

impl MulticastConfig {
    /// Negative, zero or non-finite values disable the timeout.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|d| !d.is_zero())
    }
}

impl ReaderConfig {
    /// Create a configuration with every option at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header sent with HTTP(S) requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the multicast read timeout.
    pub fn with_multicast_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.multicast.read_timeout_secs = timeout.map(|d| d.as_secs_f64());
        self
    }

    /// Set the receive-buffer ceiling for UDP and multicast sockets.
    pub fn with_recv_buffer_ceiling(mut self, bytes: usize) -> Self {
        self.udp.recv_buffer_ceiling = bytes;
        self
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(s: &str) -> crate::error::Result<Self> {
        serde_json::from_str(s).map_err(|e| crate::error::ReaderError::Config(e.to_string()))
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(s).map_err(|e| crate::error::ReaderError::Config(e.to_string()))
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> crate::error::Result<Self> {
        toml::from_str(s).map_err(|e| crate::error::ReaderError::Config(e.to_string()))
    }
}
