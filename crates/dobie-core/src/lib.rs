//! Core logic for the dobie project run page
//!
//! This crate provides:
//! - The page state and its transitions (build, start, stop, delete, file views)
//! - The effect runner that talks to the orchestration service
//! - Project reference resolution against the config registry

mod controller;
mod error;
mod projects;
mod state;

pub use controller::*;
pub use error::*;
pub use projects::*;
pub use state::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
