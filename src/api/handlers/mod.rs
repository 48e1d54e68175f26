//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod redirects;

pub use health::health_handler;
pub use redirect::{execute_handler, no_route_handler};
pub use redirects::{
    create_redirect_handler, delete_redirect_handler, get_redirect_handler,
    list_redirects_handler, update_redirect_handler, upsert_redirect_handler,
};
