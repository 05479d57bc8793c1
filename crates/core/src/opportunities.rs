//! Arbitrage opportunity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PriceSnapshotRow, TradeDirection, VenueId};

/// One direction of a cross-venue trade, before fees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalCandidate {
    pub direction: TradeDirection,
    pub buy_venue: VenueId,
    pub sell_venue: VenueId,
    pub buy_price: f64,
    pub sell_price: f64,
    /// Relative to the buy price, in percent
    pub spread_percent: f64,
}

impl DirectionalCandidate {
    pub fn new(
        direction: TradeDirection,
        buy_venue: VenueId,
        sell_venue: VenueId,
        buy_price: f64,
        sell_price: f64,
    ) -> Self {
        Self {
            direction,
            spread_percent: spread_percent(buy_price, sell_price),
            buy_venue,
            sell_venue,
            buy_price,
            sell_price,
        }
    }
}

/// Percentage gain from buying at `buy_price` and selling at `sell_price`.
///
/// Callers must pass a positive `buy_price`.
pub fn spread_percent(buy_price: f64, sell_price: f64) -> f64 {
    ((sell_price - buy_price) / buy_price) * 100.0
}

/// Detected arbitrage opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub asset_symbol: String,
    pub buy_venue: VenueId,
    pub sell_venue: VenueId,
    pub buy_price: f64,
    pub sell_price: f64,
    pub spread_percent: f64,

    // Profit calculation
    pub net_profit_per_unit: f64,
    /// Units needed to realise one unit of quote-currency profit
    pub min_volume_for_unit_profit: f64,

    // Market context
    pub volume_diff: f64,
    pub volatility: f64,

    pub opportunity_score: f64,  // 0.0 - 100.0
    pub observed_at: DateTime<Utc>,
}

impl ArbitrageOpportunity {
    pub fn new(
        row: &PriceSnapshotRow,
        candidate: DirectionalCandidate,
        net_profit_per_unit: f64,
        opportunity_score: f64,
    ) -> Self {
        Self {
            asset_symbol: row.asset_symbol.clone(),
            buy_venue: candidate.buy_venue,
            sell_venue: candidate.sell_venue,
            buy_price: candidate.buy_price,
            sell_price: candidate.sell_price,
            spread_percent: candidate.spread_percent,
            net_profit_per_unit,
            min_volume_for_unit_profit: (1.0 / net_profit_per_unit).abs(),
            volume_diff: row.volume_diff,
            volatility: row.volatility,
            opportunity_score,
            observed_at: row.observed_at,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit_per_unit > 0.0
    }

    /// Single-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{}: buy on {} at ${:.2}, sell on {} at ${:.2} | spread {:.2}% | net ${:.4}/unit | score {:.1}/100 | volume required {:.2} units | volatility {:.2}% | {}",
            self.asset_symbol,
            self.buy_venue,
            self.buy_price,
            self.sell_venue,
            self.sell_price,
            self.spread_percent,
            self.net_profit_per_unit,
            self.opportunity_score,
            self.min_volume_for_unit_profit,
            self.volatility,
            self.observed_at.format("%H:%M:%S"),
        )
    }
}
