//! Config module tests.
