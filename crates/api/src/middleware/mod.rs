//! Request extractors that gate handlers on the caller's session.

pub mod auth;
pub mod rbac;
