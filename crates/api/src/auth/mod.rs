//! Operator credentials: Argon2id password hashes and session-bound access tokens.

pub mod password;
pub mod token;
