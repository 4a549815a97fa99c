//! HTTP implementations of the lead store and identity seams.
//!
//! [`RestLeadStore`] and [`RestAuthProvider`] share one [`ApiClient`], so the
//! bearer token obtained at login is used by every store call.

pub mod auth;
pub mod client;
pub mod config;
pub mod store;

pub use auth::RestAuthProvider;
pub use client::{ApiClient, ApiError};
pub use config::ClientConfig;
pub use store::RestLeadStore;
