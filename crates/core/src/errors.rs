//! Error types

use thiserror::Error;

use crate::VenueId;

/// Core error types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Fee model errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeeError {
    #[error("No fee schedule for venue {0}")]
    UnknownVenue(VenueId),

    #[error("Invalid fee input: {0}")]
    InvalidInput(String),

    #[error("Fee rate out of range for {venue}: {rate}")]
    InvalidRate { venue: VenueId, rate: f64 },
}

/// Snapshot provider errors
#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("Snapshot source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid snapshot data: {0}")]
    InvalidData(String),

    #[error("Symbol not supported on {venue}: {asset}")]
    UnsupportedSymbol { venue: VenueId, asset: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias
pub type CoreResult<T> = Result<T, CoreError>;
pub type FeeResult<T> = Result<T, FeeError>;
pub type PriceFeedResult<T> = Result<T, PriceFeedError>;
