//! Per-row view of both trade directions, ignoring thresholds

use serde::{Deserialize, Serialize};

use cryptogap_core::{TradeDirection, VenueId};

/// Spread and fee-adjusted profit for one direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionDiagnostic {
    pub direction: TradeDirection,
    pub buy_venue: VenueId,
    pub sell_venue: VenueId,
    pub spread_percent: f64,
    pub net_profit_per_unit: Option<f64>,
    pub fee_error: Option<String>,
    pub passes_spread: bool,
}

/// Both directions for one valid row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDiagnostic {
    pub asset_symbol: String,
    pub min_spread_threshold: f64,
    pub directions: Vec<DirectionDiagnostic>,
}

impl RowDiagnostic {
    pub fn direction(&self, direction: TradeDirection) -> Option<&DirectionDiagnostic> {
        self.directions.iter().find(|d| d.direction == direction)
    }

    /// Multi-line text block in the dashboard debug layout
    pub fn render(&self) -> String {
        let mut out = format!("{}:\n", self.asset_symbol);
        for d in &self.directions {
            out.push_str(&format!(
                "  {}->{} spread: {:.3}%\n",
                d.buy_venue, d.sell_venue, d.spread_percent
            ));
        }
        out.push_str(&format!("  min required: {:.1}%\n", self.min_spread_threshold));
        for d in &self.directions {
            match (&d.net_profit_per_unit, &d.fee_error) {
                (Some(net), _) => out.push_str(&format!(
                    "  {}->{} profit: ${:.4}\n",
                    d.buy_venue, d.sell_venue, net
                )),
                (None, Some(err)) => out.push_str(&format!(
                    "  {}->{} profit: unavailable ({})\n",
                    d.buy_venue, d.sell_venue, err
                )),
                (None, None) => {}
            }
        }
        out
    }
}
