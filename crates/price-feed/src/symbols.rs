//! Venue market symbol mapping

use std::collections::HashMap;

use cryptogap_core::{PriceFeedError, PriceFeedResult, VenueId};

/// How a venue names the market for an asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolRule {
    /// `{ASSET}/{QUOTE}` for any asset
    Quote(String),
    /// Explicit per-asset table, anything else is unsupported
    Table(HashMap<String, String>),
}

impl SymbolRule {
    fn market(&self, asset: &str) -> Option<String> {
        match self {
            SymbolRule::Quote(quote) => Some(format!("{asset}/{quote}")),
            SymbolRule::Table(table) => table.get(asset).cloned(),
        }
    }
}

/// Maps asset symbols to venue-specific market symbols
#[derive(Debug, Clone, Default)]
pub struct SymbolMapper {
    rules: HashMap<VenueId, SymbolRule>,
}

impl SymbolMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binance quotes every asset against USDT, Kraken lists a fixed USD set
    pub fn reference() -> Self {
        let kraken: HashMap<String, String> = [
            ("BTC", "XBT/USD"),
            ("ETH", "ETH/USD"),
            ("SOL", "SOL/USD"),
            ("XRP", "XRP/USD"),
            ("ADA", "ADA/USD"),
            ("DOT", "DOT/USD"),
            ("LINK", "LINK/USD"),
            ("MATIC", "MATIC/USD"),
            ("AVAX", "AVAX/USD"),
            ("UNI", "UNI/USD"),
        ]
        .into_iter()
        .map(|(asset, market)| (asset.to_string(), market.to_string()))
        .collect();

        Self::new()
            .with_rule(VenueId::binance(), SymbolRule::Quote("USDT".to_string()))
            .with_rule(VenueId::kraken(), SymbolRule::Table(kraken))
    }

    pub fn with_rule(mut self, venue: VenueId, rule: SymbolRule) -> Self {
        self.rules.insert(venue, rule);
        self
    }

    /// Market symbol, or `None` if the venue does not list the asset
    pub fn market_symbol(&self, venue: &VenueId, asset: &str) -> Option<String> {
        let asset = asset.trim().to_ascii_uppercase();
        self.rules.get(venue)?.market(&asset)
    }

    pub fn require(&self, venue: &VenueId, asset: &str) -> PriceFeedResult<String> {
        self.market_symbol(venue, asset)
            .ok_or_else(|| PriceFeedError::UnsupportedSymbol {
                venue: venue.clone(),
                asset: asset.to_string(),
            })
    }

    pub fn supports(&self, venue: &VenueId, asset: &str) -> bool {
        self.market_symbol(venue, asset).is_some()
    }
}
