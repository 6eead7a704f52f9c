//! Configuration
//!
//! Database settings, server environment and relay settings.

pub mod database;
pub mod environment;
pub mod relay;

pub use environment::*;
