//! Data models for the storefront publish pipeline.
//!
//! The snapshot types mirror the JSON document the admin dashboard edits and
//! the storefront reads, so unknown fields are carried through untouched.

mod history;
mod snapshot;

pub use history::*;
pub use snapshot::*;
