//! Tests for UDP and multicast sources.

use std::collections::HashMap;
use std::io::{ErrorKind, Read};
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::config::{MulticastConfig, UdpConfig};
use crate::{
    ByteStream, DatagramReader, InputProvider, MulticastInput, SourceKind, UdpInput, reader,
};

fn sender() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").unwrap()
}

#[test]
fn unicast_receives_datagrams_sent_to_bound_address() {
    let stream = UdpInput::new("127.0.0.1", 0).open_stream().unwrap();
    let addr = stream.local_addr().unwrap();
    assert_eq!(addr.ip(), Ipv4Addr::LOCALHOST);

    let tx = sender();
    tx.send_to(b"hello", addr).unwrap();
    tx.send_to(b"world", addr).unwrap();

    let mut stream = stream;
    let mut buf = [0u8; 10];
    stream.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"helloworld");
}

#[test]
fn unicast_reads_have_no_timeout() {
    let stream = UdpInput::new("127.0.0.1", 0).open_stream().unwrap();
    assert_eq!(stream.read_timeout().unwrap(), None);
}

#[test]
fn unicast_binds_wildcard_for_empty_host() {
    let stream = UdpInput::new("", 0).open_stream().unwrap();
    assert_eq!(stream.local_addr().unwrap().ip(), Ipv4Addr::UNSPECIFIED);
}

#[test]
fn unicast_provider_describes_itself() {
    let input = UdpInput::new("127.0.0.1", 0).with_config(UdpConfig {
        recv_buffer_ceiling: 1 << 20,
        ..UdpConfig::default()
    });
    assert_eq!(input.id(), "udp://127.0.0.1:0");
    assert_eq!(input.kind(), SourceKind::Udp);
    assert_eq!(input.open().unwrap().kind(), SourceKind::Udp);
}

#[test]
fn datagram_reader_returns_one_datagram_per_read() {
    let rx = UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = rx.local_addr().unwrap();
    let tx = sender();
    tx.send_to(b"ab", addr).unwrap();
    tx.send_to(b"cd", addr).unwrap();

    let mut reader = DatagramReader::new(rx);
    let mut buf = [0u8; 16];
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"ab");
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"cd");
    assert_eq!(reader.read(&mut []).unwrap(), 0);
}

#[test]
fn datagram_reader_times_out_when_idle() {
    let rx = UdpSocket::bind("127.0.0.1:0").unwrap();
    rx.set_read_timeout(Some(Duration::from_millis(50))).unwrap();

    let mut reader = DatagramReader::new(rx);
    let mut buf = [0u8; 188];
    let err = reader.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimedOut);
}

#[test]
fn multicast_provider_describes_itself() {
    let input = MulticastInput::new(Ipv4Addr::new(227, 1, 3, 10), 4310);
    assert_eq!(input.id(), "udp://@227.1.3.10:4310");
    assert_eq!(input.kind(), SourceKind::Multicast);
    assert_eq!(input.multicast_config().ttl, 32);
}

/// Sender whose multicast traffic leaves through the loopback interface.
fn loopback_multicast_sender() -> Socket {
    let tx = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).unwrap();
    tx.set_multicast_if_v4(&Ipv4Addr::LOCALHOST).unwrap();
    tx.set_multicast_loop_v4(true).unwrap();
    tx.bind(&SocketAddr::from((Ipv4Addr::LOCALHOST, 0)).into()).unwrap();
    tx
}

fn loopback_multicast(timeout_secs: f64) -> MulticastConfig {
    MulticastConfig {
        read_timeout_secs: Some(timeout_secs),
        interface: Ipv4Addr::LOCALHOST,
        ..MulticastConfig::default()
    }
}

#[test]
fn multicast_joins_on_wildcard_with_default_options() {
    let group = Ipv4Addr::new(239, 255, 42, 99);
    let stream = MulticastInput::new(group, 0).open_stream().unwrap();

    assert_eq!(stream.group(), group);
    assert_eq!(stream.local_addr().unwrap().ip(), Ipv4Addr::UNSPECIFIED);
    assert_eq!(stream.socket().multicast_ttl_v4().unwrap(), 32);
    assert_eq!(stream.read_timeout().unwrap(), Some(Duration::from_secs(60)));
    Box::new(stream).close().unwrap();
}

#[test]
fn multicast_descriptor_opens_through_reader() {
    let stream = reader(Some("udp://@239.255.42.98:0"), &HashMap::new()).unwrap();
    assert_eq!(stream.kind(), SourceKind::Multicast);
    stream.close().unwrap();
}

#[test]
fn multicast_read_times_out_without_traffic() {
    let input = MulticastInput::new(Ipv4Addr::new(239, 255, 42, 97), 0)
        .with_config(UdpConfig::default(), loopback_multicast(0.2));

    let mut stream = input.open_stream().unwrap();
    assert_eq!(
        stream.read_timeout().unwrap(),
        Some(Duration::from_millis(200))
    );
    let mut buf = [0u8; 1316];
    let err = stream.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimedOut);
    Box::new(stream).close().unwrap();
}

#[test]
fn multicast_delivers_one_datagram_per_read() {
    let group = Ipv4Addr::new(239, 255, 42, 96);
    let input = MulticastInput::new(group, 0)
        .with_config(UdpConfig::default(), loopback_multicast(5.0));
    let mut stream = input.open_stream().unwrap();
    let port = stream.local_addr().unwrap().port();

    let tx = loopback_multicast_sender();
    let dest: SockAddr = SocketAddr::from((group, port)).into();
    tx.send_to(b"\x47first", &dest).unwrap();
    tx.send_to(b"\x47second", &dest).unwrap();

    let mut buf = [0u8; 1316];
    let n = stream.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"\x47first");
    let n = stream.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"\x47second");
    Box::new(stream).close().unwrap();
}
