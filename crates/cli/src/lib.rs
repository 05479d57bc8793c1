//! Command-line front end for the CryptoGap scanner
//!
//! Loads layered configuration, reads one snapshot, runs one scan

pub mod app;
pub mod settings;

pub use app::{build_scanner, run};
