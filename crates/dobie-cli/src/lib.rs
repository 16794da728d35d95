//! dobie CLI library
//!
//! Command implementations live here so they can be tested without the binary.

pub mod commands;
