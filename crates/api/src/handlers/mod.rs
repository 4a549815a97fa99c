pub mod auth;
pub mod leads;
