//! Shared plumbing for the adoption workspace: logging setup and small
//! response types used across crates.

pub mod types;
pub mod utils;
