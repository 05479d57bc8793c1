//! Core types and utilities for the CryptoGap arbitrage scanner
//!
//! This crate provides shared types used across all components:
//! - Venue identifiers and trade directions
//! - Price snapshot rows
//! - Arbitrage opportunity types
//! - Venue fee schedule and fee model
//! - Configuration and errors

pub mod types;
pub mod snapshot;
pub mod opportunities;
pub mod fees;
pub mod config;
pub mod errors;

pub use types::*;
pub use snapshot::*;
pub use opportunities::*;
pub use fees::*;
pub use config::*;
pub use errors::*;
