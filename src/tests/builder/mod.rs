//! Builder and dispatcher tests.
