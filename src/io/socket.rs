//! Datagram socket construction for UDP and multicast sources.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use crate::config::{MulticastConfig, UdpConfig};

/// Access to a socket's kernel receive buffer.
pub trait RecvBuffer {
    fn recv_buffer_size(&self) -> io::Result<usize>;
    fn set_recv_buffer_size(&self, size: usize) -> io::Result<()>;
}

impl RecvBuffer for Socket {
    fn recv_buffer_size(&self) -> io::Result<usize> {
        Socket::recv_buffer_size(self)
    }

    fn set_recv_buffer_size(&self, size: usize) -> io::Result<()> {
        Socket::set_recv_buffer_size(self, size)
    }
}

/// Grow the receive buffer by doubling until the OS stops accepting.
///
/// Starts from the current size and requests twice the last accepted size
/// each round, reading the effective size back after every request. Stops
/// at the first request that would pass `ceiling`, that the OS rejects, or
/// that leaves the effective size unchanged. Returns the last accepted size.
///
/// Only requests are bounded by `ceiling`. Linux reports twice the size it
/// stores, so the returned size can be up to twice the ceiling there.
pub fn negotiate_recv_buffer<S>(socket: &S, ceiling: usize) -> io::Result<usize>
where
    S: RecvBuffer + ?Sized,
{
    let mut accepted = socket.recv_buffer_size()?;

    loop {
        let attempt = match accepted.checked_mul(2) {
            Some(n) if n > 0 && n <= ceiling => n,
            _ => {
                tracing::debug!(accepted, ceiling, "receive buffer reached ceiling");
                break;
            }
        };

        if let Err(error) = socket.set_recv_buffer_size(attempt) {
            tracing::debug!(attempt, %error, "receive buffer size rejected");
            break;
        }

        let effective = socket.recv_buffer_size()?;
        if effective <= accepted {
            tracing::debug!(attempt, effective, "receive buffer size capped");
            break;
        }
        accepted = effective;
    }

    tracing::info!(recv_buffer = accepted, "receive buffer negotiated");
    Ok(accepted)
}

/// IPv4 datagram socket with a negotiated receive buffer and address reuse.
fn udp_socket(config: &UdpConfig) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    negotiate_recv_buffer(&socket, config.recv_buffer_ceiling)?;
    socket.set_reuse_address(true)?;
    #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
    {
        if config.reuse_port {
            socket.set_reuse_port(true)?;
        }
    }
    Ok(socket)
}

/// Resolve a unicast host to the IPv4 address to bind.
///
/// An empty host is the wildcard address. Names resolve through the system
/// resolver; the first IPv4 result wins.
pub fn resolve_v4(host: &str, port: u16) -> io::Result<Option<SocketAddrV4>> {
    if host.is_empty() {
        return Ok(Some(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port)));
    }
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(Some(SocketAddrV4::new(ip, port)));
    }
    let found = (host, port).to_socket_addrs()?.find_map(|addr| match addr {
        SocketAddr::V4(v4) => Some(v4),
        SocketAddr::V6(_) => None,
    });
    Ok(found)
}

/// Bind a receive-only UDP socket to `addr`.
pub fn bind_udp(addr: SocketAddrV4, config: &UdpConfig) -> io::Result<UdpSocket> {
    let socket = udp_socket(config)?;
    socket.bind(&SocketAddr::V4(addr).into())?;
    tracing::debug!(%addr, "udp socket bound");
    Ok(socket.into())
}

/// Bind a socket on `port` and join `group`.
///
/// The socket binds the wildcard address unless `bind_group` is set, so it
/// receives the group's traffic on every local interface.
pub fn bind_multicast(
    group: Ipv4Addr,
    port: u16,
    udp: &UdpConfig,
    multicast: &MulticastConfig,
    read_timeout: Option<Duration>,
) -> io::Result<UdpSocket> {
    let socket = udp_socket(udp)?;
    socket.set_multicast_ttl_v4(multicast.ttl)?;

    let bind_ip = if multicast.bind_group {
        group
    } else {
        Ipv4Addr::UNSPECIFIED
    };
    socket.bind(&SocketAddr::V4(SocketAddrV4::new(bind_ip, port)).into())?;
    socket.join_multicast_v4(&group, &multicast.interface)?;
    socket.set_read_timeout(read_timeout)?;

    tracing::debug!(
        %group,
        port,
        interface = %multicast.interface,
        ttl = multicast.ttl,
        ?read_timeout,
        "joined multicast group"
    );
    Ok(socket.into())
}
