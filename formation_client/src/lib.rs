//! Async HTTP client for the formation compute platform.
//!
//! [`mgmt_api::Client`] wraps the `/formations` management API: configuration
//! CRUD, the active configuration set, and formation-level operations. Bearer
//! tokens are acquired per request through [`token::TokenApi`] from the
//! configured identity endpoint.

pub mod config;
pub mod mgmt_api;
pub mod token;

pub use config::Config;
