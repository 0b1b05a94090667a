//! # seedbed-core: schema provisioning for the launch waitlist stack
//!
//! Applies an ordered list of DDL steps to a Supabase Postgres database
//! (waitlist, profiles, credits, plus the indexes, row-level-security
//! policies, and triggers they need), verifies the resulting catalog state,
//! and can reverse the whole schema with one existence-guarded rollback
//! script.
//!
//! The step table is configuration data, not logic: order is load-bearing
//! and fixed at build time. The executor is a linear pass with fail-fast
//! semantics and a single recoverable error class (the target object already
//! exists).

pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod rollback;
pub mod steps;
pub mod verify;

// Re-export core types
pub use config::*;
pub use error::*;
pub use executor::*;
pub use report::*;
pub use rollback::*;
pub use steps::*;
pub use verify::*;
