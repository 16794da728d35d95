//! Configuration for dobie
//!
//! This crate handles:
//! - Global configuration (`~/.config/dobie/config.toml`)
//! - Endpoint routing for the orchestration service
//! - The registry of known projects

mod endpoints;
mod error;
mod global;

pub use endpoints::*;
pub use error::*;
pub use global::*;
