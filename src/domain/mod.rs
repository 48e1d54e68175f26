//! Domain layer containing the redirect entity and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Concrete stores live in [`crate::infrastructure::persistence`] and
//! the cache-aside wrapper in [`crate::application::services`].

pub mod entities;
pub mod repositories;
