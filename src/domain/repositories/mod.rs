//! Repository trait definitions for the domain layer.
//!
//! # Available Repositories
//!
//! - [`RedirectRepository`] - Durable redirect storage (the primary store)
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests. See
//! `tests/repository_redirect.rs` for PostgreSQL-backed usage.

pub mod redirect_repository;

pub use redirect_repository::RedirectRepository;

#[cfg(test)]
pub use redirect_repository::MockRedirectRepository;
