//! Venue fee schedule and fee-adjusted profit model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

use crate::{FeeConfig, FeeError, FeeResult, OrderType, VenueId};

/// Fee rates for a single venue, as fractions (0.001 = 0.1%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VenueFees {
    pub maker: f64,
    pub taker: f64,
    pub withdrawal: f64,
}

impl VenueFees {
    pub fn new(maker: f64, taker: f64, withdrawal: f64) -> Self {
        Self { maker, taker, withdrawal }
    }

    pub fn trading_fee(&self, order_type: OrderType) -> f64 {
        match order_type {
            OrderType::Maker => self.maker,
            OrderType::Taker => self.taker,
        }
    }
}

/// Fee rates indexed by venue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    venues: HashMap<VenueId, VenueFees>,
}

impl FeeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published spot rates for the two reference venues
    pub fn reference() -> Self {
        Self::new()
            .with_venue(VenueId::binance(), VenueFees::new(0.001, 0.001, 0.0005))
            .with_venue(VenueId::kraken(), VenueFees::new(0.0016, 0.0026, 0.0005))
    }

    pub fn with_venue(mut self, venue: VenueId, fees: VenueFees) -> Self {
        self.venues.insert(venue, fees);
        self
    }

    pub fn get(&self, venue: &VenueId) -> FeeResult<&VenueFees> {
        self.venues
            .get(venue)
            .ok_or_else(|| FeeError::UnknownVenue(venue.clone()))
    }

    /// Every rate must be a fraction in [0, 1)
    pub fn validate(&self) -> FeeResult<()> {
        for (venue, fees) in &self.venues {
            for rate in [fees.maker, fees.taker, fees.withdrawal] {
                if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
                    return Err(FeeError::InvalidRate {
                        venue: venue.clone(),
                        rate,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Fee-adjusted profit for a two-leg cross-venue trade
pub trait FeeModel: Send + Sync {
    /// Quote-currency profit of buying `trade_amount` on `buy_venue` and
    /// selling it on `sell_venue`, after fees on both legs.
    fn net_profit(
        &self,
        buy_price: f64,
        sell_price: f64,
        trade_amount: f64,
        buy_venue: &VenueId,
        sell_venue: &VenueId,
    ) -> FeeResult<f64>;
}

/// Fee model backed by a per-venue schedule
#[derive(Debug, Clone)]
pub struct VenueFeeModel {
    schedule: FeeSchedule,
    config: FeeConfig,
}

impl VenueFeeModel {
    pub fn new(schedule: FeeSchedule, config: FeeConfig) -> FeeResult<Self> {
        schedule.validate()?;
        Ok(Self { schedule, config })
    }

    pub fn reference() -> Self {
        Self {
            schedule: FeeSchedule::reference(),
            config: FeeConfig::default(),
        }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.schedule
    }
}

impl Default for VenueFeeModel {
    fn default() -> Self {
        Self::reference()
    }
}

impl FeeModel for VenueFeeModel {
    fn net_profit(
        &self,
        buy_price: f64,
        sell_price: f64,
        trade_amount: f64,
        buy_venue: &VenueId,
        sell_venue: &VenueId,
    ) -> FeeResult<f64> {
        for (name, value) in [
            ("buy_price", buy_price),
            ("sell_price", sell_price),
            ("trade_amount", trade_amount),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FeeError::InvalidInput(format!("{name} = {value}")));
            }
        }

        let buy_fees = self.schedule.get(buy_venue)?;
        let sell_fees = self.schedule.get(sell_venue)?;

        let buy_notional = buy_price * trade_amount;
        let sell_notional = sell_price * trade_amount;

        let mut fees = buy_notional * buy_fees.trading_fee(self.config.order_type)
            + sell_notional * sell_fees.trading_fee(self.config.order_type);
        if self.config.include_withdrawal {
            fees += buy_notional * buy_fees.withdrawal;
        }

        let net = (sell_notional - buy_notional) - fees;
        trace!(%buy_venue, %sell_venue, buy_price, sell_price, fees, net, "net profit");
        Ok(net)
    }
}
