//! Core domain entities.
//!
//! - [`Redirect`] - A stored mapping from an id and/or host name to a destination

pub mod redirect;

pub use redirect::Redirect;
