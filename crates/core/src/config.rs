//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{CoreError, CoreResult, OrderType, VenueId, DEFAULT_ASSETS};

/// Detection thresholds passed to every scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum spread in percent (0.1 = 0.1%)
    pub min_spread_threshold: f64,
    /// Net profit must exceed this to count as profitable
    pub profit_epsilon: f64,
    /// Notional trade size used for fee evaluation
    pub trade_amount: f64,
    /// Evaluate rows on the rayon pool
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_spread_threshold: 0.1,
            profit_epsilon: 1e-5,
            trade_amount: 1.0,
            parallel: false,
        }
    }
}

impl ScanConfig {
    pub fn with_min_spread(mut self, threshold: f64) -> Self {
        self.min_spread_threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !self.min_spread_threshold.is_finite() || self.min_spread_threshold < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "min_spread_threshold must be a non-negative number, got {}",
                self.min_spread_threshold
            )));
        }
        if !self.profit_epsilon.is_finite() || self.profit_epsilon < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "profit_epsilon must be a non-negative number, got {}",
                self.profit_epsilon
            )));
        }
        if !self.trade_amount.is_finite() || self.trade_amount <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "trade_amount must be positive, got {}",
                self.trade_amount
            )));
        }
        Ok(())
    }
}

/// Fee model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    pub order_type: OrderType,
    /// Deduct the buy venue's withdrawal fee for moving the asset
    pub include_withdrawal: bool,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            order_type: OrderType::Taker,
            include_withdrawal: false,
        }
    }
}

/// Snapshot assembly configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub venue_a: VenueId,
    pub venue_b: VenueId,
    pub assets: Vec<String>,
    /// Number of closes used for the volatility estimate
    pub volatility_window: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            venue_a: VenueId::binance(),
            venue_b: VenueId::kraken(),
            assets: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
            volatility_window: 60,  // one hour of 1m candles
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub fees: FeeConfig,
    /// JSON snapshot consumed by the one-shot scan
    pub snapshot_path: Option<PathBuf>,
    /// Log both directions for every row regardless of thresholds
    pub show_diagnostics: bool,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            fees: FeeConfig::default(),
            snapshot_path: None,
            show_diagnostics: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> CoreResult<()> {
        self.scan.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scan_config() {
        let config = ScanConfig::default();
        assert_eq!(config.min_spread_threshold, 0.1);
        assert_eq!(config.profit_epsilon, 1e-5);
        assert_eq!(config.trade_amount, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = ScanConfig::default().with_min_spread(-0.5);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));

        let nan = ScanConfig::default().with_min_spread(f64::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_trade_amount_must_be_positive() {
        let config = ScanConfig {
            trade_amount: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"scan": {"min_spread_threshold": 0.5}}"#).unwrap();
        assert_eq!(config.scan.min_spread_threshold, 0.5);
        assert_eq!(config.scan.trade_amount, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_rejects_invalid_scan() {
        let mut config = AppConfig::default();
        config.scan.profit_epsilon = f64::NAN;
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_feed_config_defaults() {
        let feed = FeedConfig::default();
        assert_eq!(feed.venue_a, VenueId::binance());
        assert_eq!(feed.venue_b, VenueId::kraken());
        assert_eq!(feed.volatility_window, 60);
    }
}
