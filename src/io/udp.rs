//! UDP unicast and multicast sources.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use super::socket::{bind_multicast, bind_udp, resolve_v4};
use super::{ByteStream, InputProvider, SourceKind};
use crate::config::{MULTICAST_PREFIX, MulticastConfig, UDP_PREFIX, UdpConfig};
use crate::error::{ReaderError, Result};

/// `Read` over a bound datagram socket. Each `read` is one `recv`.
///
/// A datagram larger than the caller's buffer is truncated by the OS.
/// When the socket has a read timeout, an expired wait surfaces as
/// `io::ErrorKind::TimedOut` on every platform.
#[derive(Debug)]
pub struct DatagramReader {
    socket: UdpSocket,
}

impl DatagramReader {
    pub fn new(socket: UdpSocket) -> Self {
        Self { socket }
    }

    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }

    pub fn into_inner(self) -> UdpSocket {
        self.socket
    }
}

impl Read for DatagramReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.socket.recv(buf).map_err(|e| match e.kind() {
            // Unix reports an expired SO_RCVTIMEO as EAGAIN.
            io::ErrorKind::WouldBlock => io::Error::new(
                io::ErrorKind::TimedOut,
                "no datagram received before the read timeout",
            ),
            _ => e,
        })
    }
}

/// Buffered stream over a unicast UDP socket.
///
/// Reads may span datagram boundaries. There is no read timeout.
pub struct UdpStream {
    inner: BufReader<DatagramReader>,
}

impl UdpStream {
    pub fn new(socket: UdpSocket, capacity: usize) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, DatagramReader::new(socket)),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.get_ref().socket().local_addr()
    }

    pub fn read_timeout(&self) -> io::Result<Option<Duration>> {
        self.inner.get_ref().socket().read_timeout()
    }
}

impl fmt::Debug for UdpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UdpStream")
            .field("local_addr", &self.local_addr().ok())
            .field("buffered", &self.inner.buffer().len())
            .finish()
    }
}

impl Read for UdpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for UdpStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl ByteStream for UdpStream {
    fn kind(&self) -> SourceKind {
        SourceKind::Udp
    }
}

/// Stream over a multicast membership. Each `read` is one datagram.
#[derive(Debug)]
pub struct MulticastStream {
    reader: DatagramReader,
    group: Ipv4Addr,
    interface: Ipv4Addr,
}

impl MulticastStream {
    pub fn new(socket: UdpSocket, group: Ipv4Addr, interface: Ipv4Addr) -> Self {
        Self {
            reader: DatagramReader::new(socket),
            group,
            interface,
        }
    }

    pub fn group(&self) -> Ipv4Addr {
        self.group
    }

    pub fn socket(&self) -> &UdpSocket {
        self.reader.socket()
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.reader.socket().local_addr()
    }

    pub fn read_timeout(&self) -> io::Result<Option<Duration>> {
        self.reader.socket().read_timeout()
    }
}

impl Read for MulticastStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl ByteStream for MulticastStream {
    fn kind(&self) -> SourceKind {
        SourceKind::Multicast
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        self.reader
            .socket()
            .leave_multicast_v4(&self.group, &self.interface)?;
        tracing::debug!(group = %self.group, "left multicast group");
        Ok(())
    }
}

/// Input provider for `udp://<host>:<port>`.
///
/// Binds `host:port` locally and receives whatever is sent there; it does
/// not connect to a peer.
#[derive(Debug, Clone)]
pub struct UdpInput {
    id: String,
    host: String,
    port: u16,
    config: UdpConfig,
}

impl UdpInput {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            id: format!("{UDP_PREFIX}{host}:{port}"),
            host,
            port,
            config: UdpConfig::default(),
        }
    }

    pub fn with_config(mut self, config: UdpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn config(&self) -> &UdpConfig {
        &self.config
    }

    /// Resolve the host to the local IPv4 address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddrV4> {
        resolve_v4(&self.host, self.port)?
            .ok_or_else(|| ReaderError::invalid_source(&self.id, "host has no IPv4 address"))
    }

    /// Bind the socket and wrap it as a buffered stream.
    pub fn open_stream(&self) -> Result<UdpStream> {
        let socket = bind_udp(self.bind_addr()?, &self.config)?;
        Ok(UdpStream::new(socket, self.config.stream_capacity()))
    }
}

impl InputProvider for UdpInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Udp
    }

    fn open(&self) -> Result<Box<dyn ByteStream>> {
        Ok(Box::new(self.open_stream()?))
    }
}

/// Input provider for `udp://@<group>:<port>`.
#[derive(Debug, Clone)]
pub struct MulticastInput {
    id: String,
    group: Ipv4Addr,
    port: u16,
    udp: UdpConfig,
    multicast: MulticastConfig,
}

impl MulticastInput {
    pub fn new(group: Ipv4Addr, port: u16) -> Self {
        Self {
            id: format!("{MULTICAST_PREFIX}{group}:{port}"),
            group,
            port,
            udp: UdpConfig::default(),
            multicast: MulticastConfig::default(),
        }
    }

    pub fn with_config(mut self, udp: UdpConfig, multicast: MulticastConfig) -> Self {
        self.udp = udp;
        self.multicast = multicast;
        self
    }

    pub fn group(&self) -> Ipv4Addr {
        self.group
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn udp_config(&self) -> &UdpConfig {
        &self.udp
    }

    pub fn multicast_config(&self) -> &MulticastConfig {
        &self.multicast
    }

    /// Join the group and wrap the socket as a one-datagram-per-read stream.
    pub fn open_stream(&self) -> Result<MulticastStream> {
        let socket = bind_multicast(
            self.group,
            self.port,
            &self.udp,
            &self.multicast,
            self.multicast.read_timeout(),
        )?;
        Ok(MulticastStream::new(
            socket,
            self.group,
            self.multicast.interface,
        ))
    }
}

impl InputProvider for MulticastInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Multicast
    }

    fn open(&self) -> Result<Box<dyn ByteStream>> {
        Ok(Box::new(self.open_stream()?))
    }
}
