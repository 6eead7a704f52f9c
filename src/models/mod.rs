//! Data models
//!
//! This module contains the records that map to the five tables of the
//! schema, plus the JWT claim types.

pub mod account;
pub mod auth;
pub mod invoice;
pub mod order;
pub mod quote;
pub mod rider;
