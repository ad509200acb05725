//! Async HTTP(S), UDP and multicast sources.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use tokio::io::{AsyncRead, BufReader, ReadBuf};
use tokio::net::UdpSocket;
use tokio::time::Sleep;
use tokio_util::io::StreamReader;

use super::socket::{bind_multicast, bind_udp};
use super::{AsyncByteStream, AsyncInputProvider, MulticastInput, SourceKind, UdpInput};
use crate::config::HttpConfig;
use crate::error::Result;

/// Async input provider for `http://` and `https://` URLs.
#[derive(Debug, Clone)]
pub struct AsyncHttpInput {
    url: String,
    headers: BTreeMap<String, String>,
    config: HttpConfig,
}

impl AsyncHttpInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            config: HttpConfig::default(),
        }
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.config.user_agent.as_str());
        if let Some(timeout) = self.config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// Send the GET and wrap the response body as a stream.
    pub async fn open_stream(&self) -> Result<AsyncHttpStream> {
        let client = self.client()?;
        let mut request = client.get(&self.url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await?.error_for_status()?;
        let status = response.status();
        tracing::debug!(url = %self.url, %status, "http response");

        let body = response.bytes_stream().map_err(io::Error::other);
        Ok(AsyncHttpStream {
            url: self.url.clone(),
            status,
            body: Box::pin(StreamReader::new(body)),
        })
    }
}

/// Body of a successful HTTP(S) response.
pub struct AsyncHttpStream {
    url: String,
    status: reqwest::StatusCode,
    body: Pin<Box<dyn AsyncRead + Send>>,
}

impl AsyncHttpStream {
    pub fn status(&self) -> reqwest::StatusCode {
        self.status
    }
}

impl fmt::Debug for AsyncHttpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncHttpStream")
            .field("url", &self.url)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl AsyncRead for AsyncHttpStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.body.as_mut().poll_read(cx, buf)
    }
}

impl AsyncByteStream for AsyncHttpStream {
    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }
}

#[async_trait]
impl AsyncInputProvider for AsyncHttpInput {
    fn id(&self) -> &str {
        &self.url
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }

    async fn open(&self) -> Result<Box<dyn AsyncByteStream>> {
        Ok(Box::new(self.open_stream().await?))
    }
}

/// `AsyncRead` over a datagram socket. Each read is one datagram.
///
/// With a timeout set, a read that waits longer than the timeout for a
/// datagram fails with `io::ErrorKind::TimedOut`.
#[derive(Debug)]
pub struct AsyncDatagramReader {
    socket: UdpSocket,
    timeout: Option<Duration>,
    deadline: Option<Pin<Box<Sleep>>>,
}

impl AsyncDatagramReader {
    pub fn new(socket: UdpSocket, timeout: Option<Duration>) -> Self {
        Self {
            socket,
            timeout,
            deadline: None,
        }
    }

    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl AsyncRead for AsyncDatagramReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        match this.socket.poll_recv(cx, buf) {
            Poll::Ready(result) => {
                this.deadline = None;
                Poll::Ready(result)
            }
            Poll::Pending => {
                let Some(timeout) = this.timeout else {
                    return Poll::Pending;
                };
                let deadline = this
                    .deadline
                    .get_or_insert_with(|| Box::pin(tokio::time::sleep(timeout)));
                match deadline.as_mut().poll(cx) {
                    Poll::Ready(()) => {
                        this.deadline = None;
                        Poll::Ready(Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "no datagram received before the read timeout",
                        )))
                    }
                    Poll::Pending => Poll::Pending,
                }
            }
        }
    }
}

fn into_tokio(socket: std::net::UdpSocket) -> io::Result<UdpSocket> {
    socket.set_nonblocking(true)?;
    UdpSocket::from_std(socket)
}

/// Buffered async stream over a unicast UDP socket.
#[derive(Debug)]
pub struct AsyncUdpStream {
    inner: BufReader<AsyncDatagramReader>,
}

impl AsyncUdpStream {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.get_ref().socket().local_addr()
    }
}

impl AsyncRead for AsyncUdpStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncByteStream for AsyncUdpStream {
    fn kind(&self) -> SourceKind {
        SourceKind::Udp
    }
}

/// Async stream over a multicast membership. Each read is one datagram.
#[derive(Debug)]
pub struct AsyncMulticastStream {
    reader: AsyncDatagramReader,
    group: Ipv4Addr,
    interface: Ipv4Addr,
}

impl AsyncMulticastStream {
    pub fn group(&self) -> Ipv4Addr {
        self.group
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.reader.socket().local_addr()
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.reader.timeout()
    }
}

impl AsyncRead for AsyncMulticastStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.reader).poll_read(cx, buf)
    }
}

impl AsyncByteStream for AsyncMulticastStream {
    fn kind(&self) -> SourceKind {
        SourceKind::Multicast
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        self.reader
            .socket()
            .leave_multicast_v4(self.group, self.interface)?;
        tracing::debug!(group = %self.group, "left multicast group");
        Ok(())
    }
}

/// Async input provider for `udp://<host>:<port>`.
#[derive(Debug, Clone)]
pub struct AsyncUdpInput {
    inner: UdpInput,
}

impl AsyncUdpInput {
    pub fn new(inner: UdpInput) -> Self {
        Self { inner }
    }

    /// Bind the socket and wrap it as a buffered stream.
    pub async fn open_stream(&self) -> Result<AsyncUdpStream> {
        let config = self.inner.config();
        let socket = into_tokio(bind_udp(self.inner.bind_addr()?, config)?)?;
        let reader = AsyncDatagramReader::new(socket, None);
        Ok(AsyncUdpStream {
            inner: BufReader::with_capacity(config.stream_capacity(), reader),
        })
    }
}

#[async_trait]
impl AsyncInputProvider for AsyncUdpInput {
    fn id(&self) -> &str {
        super::InputProvider::id(&self.inner)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Udp
    }

    async fn open(&self) -> Result<Box<dyn AsyncByteStream>> {
        Ok(Box::new(self.open_stream().await?))
    }
}

/// Async input provider for `udp://@<group>:<port>`.
#[derive(Debug, Clone)]
pub struct AsyncMulticastInput {
    inner: MulticastInput,
}

impl AsyncMulticastInput {
    pub fn new(inner: MulticastInput) -> Self {
        Self { inner }
    }

    /// Join the group and wrap the socket as a one-datagram-per-read stream.
    pub async fn open_stream(&self) -> Result<AsyncMulticastStream> {
        let multicast = self.inner.multicast_config();
        // The deadline is enforced by the reader, not SO_RCVTIMEO.
        let socket = bind_multicast(
            self.inner.group(),
            self.inner.port(),
            self.inner.udp_config(),
            multicast,
            None,
        )?;
        Ok(AsyncMulticastStream {
            reader: AsyncDatagramReader::new(into_tokio(socket)?, multicast.read_timeout()),
            group: self.inner.group(),
            interface: multicast.interface,
        })
    }
}

#[async_trait]
impl AsyncInputProvider for AsyncMulticastInput {
    fn id(&self) -> &str {
        super::InputProvider::id(&self.inner)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Multicast
    }

    async fn open(&self) -> Result<Box<dyn AsyncByteStream>> {
        Ok(Box::new(self.open_stream().await?))
    }
}
