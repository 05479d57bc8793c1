//! Price snapshot types

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{CoreError, CoreResult, TradeDirection, VenueId};

/// One asset's cross-venue state at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshotRow {
    pub asset_symbol: String,
    /// Quote price on venue A, absent if the venue returned nothing usable
    #[serde(default, deserialize_with = "lenient_price")]
    pub price_a: Option<f64>,
    /// Quote price on venue B, absent if the venue returned nothing usable
    #[serde(default, deserialize_with = "lenient_price")]
    pub price_b: Option<f64>,
    pub volume_diff: f64,
    /// Short-horizon volatility in percent
    pub volatility: f64,
    pub observed_at: DateTime<Utc>,
}

impl PriceSnapshotRow {
    pub fn new(
        asset_symbol: impl Into<String>,
        price_a: Option<f64>,
        price_b: Option<f64>,
        volume_diff: f64,
        volatility: f64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            asset_symbol: asset_symbol.into(),
            price_a,
            price_b,
            volume_diff,
            volatility,
            observed_at,
        }
    }

    /// Both prices, if each is present, finite and strictly positive
    pub fn valid_prices(&self) -> Option<(f64, f64)> {
        let a = self.price_a.filter(|p| is_positive_price(*p))?;
        let b = self.price_b.filter(|p| is_positive_price(*p))?;
        Some((a, b))
    }

    /// Volume and volatility are usable for scoring
    pub fn has_valid_metrics(&self) -> bool {
        is_non_negative(self.volume_diff) && is_non_negative(self.volatility)
    }

    /// Buy and sell price for a trade direction
    pub fn prices_for(&self, direction: TradeDirection) -> Option<(f64, f64)> {
        let (a, b) = self.valid_prices()?;
        Some(match direction {
            TradeDirection::AToB => (a, b),
            TradeDirection::BToA => (b, a),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Numbers and numeric strings become prices; anything else is treated as missing
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        Some(RawPrice::Number(p)) => Some(p),
        Some(RawPrice::Text(s)) => s.trim().parse().ok(),
        Some(RawPrice::Other(_)) | None => None,
    })
}

fn is_positive_price(p: f64) -> bool {
    p.is_finite() && p > 0.0
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// A batch of rows observed over the same window on two venues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub venue_a: VenueId,
    pub venue_b: VenueId,
    #[serde(default)]
    pub rows: Vec<PriceSnapshotRow>,
}

impl PriceSnapshot {
    pub fn new(venue_a: VenueId, venue_b: VenueId, rows: Vec<PriceSnapshotRow>) -> Self {
        Self { venue_a, venue_b, rows }
    }

    /// Reject snapshots whose venue roles make no sense
    pub fn validate(&self) -> CoreResult<()> {
        if self.venue_a.is_empty() || self.venue_b.is_empty() {
            return Err(CoreError::MalformedSnapshot(
                "venue identifiers must not be empty".to_string(),
            ));
        }
        if self.venue_a == self.venue_b {
            return Err(CoreError::MalformedSnapshot(format!(
                "venue A and venue B are both {}",
                self.venue_a
            )));
        }
        Ok(())
    }

    /// Buy and sell venue for a trade direction
    pub fn venues_for(&self, direction: TradeDirection) -> (&VenueId, &VenueId) {
        match direction {
            TradeDirection::AToB => (&self.venue_a, &self.venue_b),
            TradeDirection::BToA => (&self.venue_b, &self.venue_a),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
