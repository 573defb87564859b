//! Test fixtures for pickup-route-planner.
//!
//! Provides Sault Ste. Marie area locations near the ReStore depot.

pub mod sault_locations;

#[allow(unused_imports)]
pub use sault_locations::*;
