//! Row structs and insert DTOs.

pub mod lead;
pub mod operator;
pub mod session;
