//! Wire types for the formation compute platform's management API.
//!
//! This crate only contains serde models shared between the platform and its
//! clients; the HTTP client itself lives in `formation_client`.

pub mod models;
