//! Domain core of the Rocket Lab lead service.
//!
//! Holds the lead record model, the client-side submission and triage flows,
//! the auth gate contract and the [`store::LeadStore`] seam the flows talk to.
//! No I/O lives here; persistence and HTTP are in the `db`, `api` and
//! `client` crates.

pub mod auth_gate;
pub mod context;
pub mod error;
pub mod lead;
pub mod roles;
pub mod store;
pub mod submission;
pub mod triage;
pub mod types;
