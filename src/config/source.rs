//! Source descriptor classification.

use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use crate::error::{ReaderError, Result};
use crate::io::SourceKind;

/// Descriptor that selects standard input.
pub const STDIN_MARKER: &str = "-";
/// Prefix of multicast descriptors, `udp://@<group>:<port>`.
pub const MULTICAST_PREFIX: &str = "udp://@";
/// Prefix of unicast descriptors, `udp://<host>:<port>`.
pub const UDP_PREFIX: &str = "udp://";

/// A classified source descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
    /// Full `http://` or `https://` URL
    Http(String),
    /// Local address to bind and receive datagrams on
    Udp { host: String, port: u16 },
    Multicast { group: Ipv4Addr, port: u16 },
}

impl Source {
    /// Classify a descriptor by prefix.
    ///
    /// `None` and `"-"` select stdin. `udp://@` is checked before `udp://`,
    /// then anything starting with `http`; everything else is a file path.
    /// Beyond splitting UDP authorities into host and port, nothing is
    /// validated here: a bad path or URL fails when it is opened.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let raw = match raw {
            None => return Ok(Source::Stdin),
            Some(s) if s == STDIN_MARKER => return Ok(Source::Stdin),
            Some(s) => s,
        };

        if let Some(authority) = raw.strip_prefix(MULTICAST_PREFIX) {
            let (group, port) = split_authority(raw, authority)?;
            let group = group
                .parse::<Ipv4Addr>()
                .map_err(|source| ReaderError::InvalidGroup {
                    source_uri: raw.to_string(),
                    source,
                })?;
            return Ok(Source::Multicast { group, port });
        }

        if let Some(authority) = raw.strip_prefix(UDP_PREFIX) {
            let (host, port) = split_authority(raw, authority)?;
            return Ok(Source::Udp {
                host: host.to_string(),
                port,
            });
        }

        if raw.starts_with("http") {
            return Ok(Source::Http(raw.to_string()));
        }

        Ok(Source::File(PathBuf::from(raw)))
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Stdin => SourceKind::Stdin,
            Source::File(_) => SourceKind::File,
            Source::Http(_) => SourceKind::Http,
            Source::Udp { .. } => SourceKind::Udp,
            Source::Multicast { .. } => SourceKind::Multicast,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str(STDIN_MARKER),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Http(url) => f.write_str(url),
            Source::Udp { host, port } => write!(f, "{UDP_PREFIX}{host}:{port}"),
            Source::Multicast { group, port } => write!(f, "{MULTICAST_PREFIX}{group}:{port}"),
        }
    }
}

/// Split `host:port` on the last colon.
fn split_authority<'a>(raw: &str, authority: &'a str) -> Result<(&'a str, u16)> {
    let (host, port) = authority
        .rsplit_once(':')
        .ok_or_else(|| ReaderError::invalid_source(raw, "expected <host>:<port>"))?;
    let port = port.parse::<u16>().map_err(|source| ReaderError::InvalidPort {
        source_uri: raw.to_string(),
        source,
    })?;
    Ok((host, port))
}
