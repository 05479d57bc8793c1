//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Assets tracked when no explicit selection is configured
pub const DEFAULT_ASSETS: [&str; 5] = ["BTC", "ETH", "SOL", "XRP", "ADA"];

/// Assets quoted on both reference venues
pub const SUPPORTED_ASSETS: [&str; 10] = [
    "BTC", "ETH", "SOL", "XRP", "ADA", "DOT", "LINK", "MATIC", "AVAX", "UNI",
];

/// Trading venue identifier
///
/// Always stored lower-cased so `"Binance"` and `"binance"` address the same
/// fee schedule entry and symbol rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VenueId(String);

impl VenueId {
    pub const BINANCE: &'static str = "binance";
    pub const KRAKEN: &'static str = "kraken";

    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_lowercase())
    }

    pub fn binance() -> Self {
        Self::new(Self::BINANCE)
    }

    pub fn kraken() -> Self {
        Self::new(Self::KRAKEN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VenueId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for VenueId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<VenueId> for String {
    fn from(v: VenueId) -> Self {
        v.0
    }
}

/// Which side of the book an order is assumed to hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Maker,
    #[default]
    Taker,
}

/// Direction of a cross-venue trade relative to a snapshot's venue roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeDirection {
    /// Buy on venue A, sell on venue B
    AToB,
    /// Buy on venue B, sell on venue A
    BToA,
}

impl TradeDirection {
    pub fn name(&self) -> &'static str {
        match self {
            TradeDirection::AToB => "A->B",
            TradeDirection::BToA => "B->A",
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
