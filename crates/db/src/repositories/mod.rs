//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod lead_repo;
pub mod operator_repo;
pub mod session_repo;

pub use lead_repo::LeadRepo;
pub use operator_repo::OperatorRepo;
pub use session_repo::SessionRepo;
