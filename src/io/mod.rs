//! I/O abstractions for source providers and the streams they open.
//!
//! This module provides:
//! - `InputProvider`: Trait for openable sources
//! - `ByteStream`: Trait for the readable handles they return
//! - Implementations for stdin, files, HTTP(S), UDP and multicast
//! - Socket helpers shared by the UDP and multicast sources

mod http;
mod input;
pub mod socket;
mod std_io;
mod udp;

pub use http::HttpInput;
pub use input::{ByteStream, InputProvider, SourceKind};
pub use socket::{RecvBuffer, negotiate_recv_buffer};
pub use std_io::{FileInput, StdinInput};
pub use udp::{DatagramReader, MulticastInput, MulticastStream, UdpInput, UdpStream};

// Async I/O support
#[cfg(feature = "async")]
mod async_input;
#[cfg(feature = "async")]
mod async_net;
#[cfg(feature = "async")]
mod async_std_io;

#[cfg(feature = "async")]
pub use async_input::{AsyncByteStream, AsyncInputProvider};
#[cfg(feature = "async")]
pub use async_net::{
    AsyncDatagramReader, AsyncHttpInput, AsyncHttpStream, AsyncMulticastInput,
    AsyncMulticastStream, AsyncUdpInput, AsyncUdpStream,
};
#[cfg(feature = "async")]
pub use async_std_io::{AsyncFileInput, AsyncStdinInput};
