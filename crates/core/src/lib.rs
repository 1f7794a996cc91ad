//! Dependency-light domain layer shared by the persistence, vendor-client,
//! and API crates.

pub mod error;
pub mod listing;
pub mod template;
pub mod types;
