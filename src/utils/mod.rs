//! Utility functions for request handling.
//!
//! - [`extract_host`] - Host name extraction for implicit resolution

pub mod extract_host;
