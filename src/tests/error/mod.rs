//! Error module tests.

mod reader_error_tests;
