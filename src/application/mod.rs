//! Application layer services implementing business logic.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Cache-aside access to redirect records

pub mod services;
