//! Tests for ReaderError helpers.

use std::error::Error;
use std::io;

use crate::config::Source;
use crate::error::ReaderError;

#[test]
fn io_errors_keep_their_kind() {
    let err = ReaderError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
    assert!(err.is_not_found());
    assert!(!err.is_timeout());
    assert_eq!(err.kind(), Some(io::ErrorKind::NotFound));
    assert_eq!(err.to_string(), "gone");
}

#[test]
fn timed_out_reads_are_timeouts() {
    let err = ReaderError::from(io::Error::new(io::ErrorKind::TimedOut, "idle"));
    assert!(err.is_timeout());
    assert!(!err.is_not_found());
}

#[test]
fn parse_errors_expose_their_source() {
    let err = Source::parse(Some("udp://1.2.3.4:http")).unwrap_err();
    assert_eq!(err.kind(), None);
    assert!(err.to_string().contains("udp://1.2.3.4:http"));
    assert!(err.source().is_some());
}

#[cfg(feature = "miette")]
#[test]
fn diagnostic_carries_help() {
    use crate::error::ReaderDiagnostic;

    let err = ReaderError::from(io::Error::new(io::ErrorKind::TimedOut, "idle"));
    let diag = ReaderDiagnostic::from(err);
    assert!(diag.message.contains("idle"));
    assert!(diag.help.unwrap().contains("multicast"));
}
