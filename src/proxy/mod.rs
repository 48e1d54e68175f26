//! Redirect and reverse-proxy forwarding.
//!
//! Given a resolved [`crate::domain::entities::Redirect`] and the inbound
//! request, [`ProxyForwarder`] either answers with a `307` or relays the
//! exchange to the destination.
//!
//! - [`target`] - destination parsing and outbound URI selection
//! - [`headers`] - declarative header rewrite table
//! - [`forwarder`] - the forwarding engine itself

pub mod forwarder;
pub mod headers;
pub mod target;

pub use forwarder::ProxyForwarder;
pub use headers::{HEADER_RULES, HeaderRule};
pub use target::ProxyTarget;
