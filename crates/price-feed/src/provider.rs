//! Snapshot providers

use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use cryptogap_core::{
    FeedConfig, PriceFeedError, PriceFeedResult, PriceSnapshot, PriceSnapshotRow,
};

use crate::state::{TickerState, VenueTicker};
use crate::symbols::SymbolMapper;

/// Source of time-coherent price snapshots
pub trait SnapshotProvider: Send + Sync {
    fn snapshot(&self) -> PriceFeedResult<PriceSnapshot>;
}

/// Reads a JSON-encoded snapshot from disk on every call
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotProvider for JsonFileProvider {
    fn snapshot(&self) -> PriceFeedResult<PriceSnapshot> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            PriceFeedError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let snapshot: PriceSnapshot = serde_json::from_str(&raw).map_err(|e| {
            PriceFeedError::InvalidData(format!("{}: {}", self.path.display(), e))
        })?;
        snapshot.validate()?;
        debug!("Loaded {} rows from {}", snapshot.len(), self.path.display());
        Ok(snapshot)
    }
}

/// Builds snapshot rows from the latest tickers of two venues
pub struct SnapshotAssembler {
    config: FeedConfig,
    mapper: SymbolMapper,
    state: Arc<TickerState>,
    max_ticker_age: Duration,
}

impl SnapshotAssembler {
    pub fn new(config: FeedConfig, mapper: SymbolMapper, state: Arc<TickerState>) -> Self {
        Self {
            config,
            mapper,
            state,
            max_ticker_age: Duration::from_secs(30),
        }
    }

    pub fn with_max_ticker_age(mut self, max_age: Duration) -> Self {
        self.max_ticker_age = max_age;
        self
    }

    pub fn state(&self) -> Arc<TickerState> {
        Arc::clone(&self.state)
    }

    /// Row for one asset, or `None` if either venue does not list it
    pub fn assemble_row(&self, asset: &str) -> Option<PriceSnapshotRow> {
        let (venue_a, venue_b) = (&self.config.venue_a, &self.config.venue_b);
        if !self.mapper.supports(venue_a, asset) || !self.mapper.supports(venue_b, asset) {
            info!("Skipping {} - not listed on both {} and {}", asset, venue_a, venue_b);
            return None;
        }

        let ticker_a = self.state.fresh_ticker(venue_a, asset, self.max_ticker_age);
        let ticker_b = self.state.fresh_ticker(venue_b, asset, self.max_ticker_age);
        if ticker_a.is_none() || ticker_b.is_none() {
            debug!(
                asset,
                has_a = ticker_a.is_some(),
                has_b = ticker_b.is_some(),
                "Incomplete tickers"
            );
        }

        let window = self.config.volatility_window;
        let volatility = self
            .state
            .volatility(venue_a, asset, window)
            .max(self.state.volatility(venue_b, asset, window));

        Some(build_row(asset, ticker_a, ticker_b, volatility))
    }
}

/// Venues quoting USD and USDT are compared 1:1.
pub fn build_row(
    asset: &str,
    ticker_a: Option<VenueTicker>,
    ticker_b: Option<VenueTicker>,
    volatility: f64,
) -> PriceSnapshotRow {
    let volume_a = ticker_a.map(|t| t.volume).unwrap_or(0.0);
    let volume_b = ticker_b.map(|t| t.volume).unwrap_or(0.0);
    let observed_ms = [ticker_a, ticker_b]
        .into_iter()
        .flatten()
        .map(|t| t.timestamp_ms)
        .max();

    PriceSnapshotRow::new(
        asset.trim().to_ascii_uppercase(),
        ticker_a.map(|t| t.price),
        ticker_b.map(|t| t.price),
        (volume_a - volume_b).abs(),
        volatility,
        observed_ms.and_then(timestamp_from_ms).unwrap_or_else(Utc::now),
    )
}

fn timestamp_from_ms(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

impl SnapshotProvider for SnapshotAssembler {
    fn snapshot(&self) -> PriceFeedResult<PriceSnapshot> {
        let rows = self
            .config
            .assets
            .iter()
            .filter_map(|asset| self.assemble_row(asset))
            .collect();
        let snapshot = PriceSnapshot::new(
            self.config.venue_a.clone(),
            self.config.venue_b.clone(),
            rows,
        );
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptogap_core::VenueId;

    fn ticker(price: f64, volume: f64, timestamp_ms: i64) -> VenueTicker {
        VenueTicker {
            price,
            volume,
            bid: price,
            ask: price,
            timestamp_ms,
        }
    }

    fn assembler(assets: &[&str]) -> SnapshotAssembler {
        let config = FeedConfig {
            assets: assets.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        SnapshotAssembler::new(config, SymbolMapper::reference(), Arc::new(TickerState::new()))
    }

    #[test]
    fn test_build_row() {
        let row = build_row(
            "eth",
            Some(ticker(3_000.0, 5_000.0, 1_700_000_000_000)),
            Some(ticker(3_010.0, 1_500.0, 1_700_000_001_000)),
            0.7,
        );
        assert_eq!(row.asset_symbol, "ETH");
        assert_eq!(row.valid_prices(), Some((3_000.0, 3_010.0)));
        assert_eq!(row.volume_diff, 3_500.0);
        assert_eq!(row.volatility, 0.7);
        assert_eq!(row.observed_at.timestamp_millis(), 1_700_000_001_000);
    }

    #[test]
    fn test_missing_ticker_leaves_price_empty() {
        let row = build_row("BTC", Some(ticker(50_000.0, 10.0, 0)), None, 0.0);
        assert_eq!(row.price_b, None);
        assert_eq!(row.volume_diff, 10.0);
    }

    #[test]
    fn test_assembler_snapshot() {
        let assembler = assembler(&["BTC", "DOGE", "ETH"]);
        let state = assembler.state();
        state.update_ticker(&VenueId::binance(), "BTC", ticker(50_000.0, 100.0, 1_000));
        state.update_ticker(&VenueId::kraken(), "BTC", ticker(50_300.0, 40.0, 2_000));
        state.update_closes(&VenueId::kraken(), "BTC", vec![100.0, 101.0, 99.99]);
        state.update_ticker(&VenueId::binance(), "ETH", ticker(3_000.0, 1.0, 1_000));

        let snapshot = assembler.snapshot().unwrap();
        assert_eq!(snapshot.venue_a, VenueId::binance());
        let assets: Vec<&str> = snapshot.rows.iter().map(|r| r.asset_symbol.as_str()).collect();
        assert_eq!(assets, vec!["BTC", "ETH"]);

        let btc = &snapshot.rows[0];
        assert_eq!(btc.volume_diff, 60.0);
        assert!(btc.volatility > 1.4);
        assert_eq!(snapshot.rows[1].price_b, None);
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cryptogap-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_json_file_provider() {
        let path = temp_path("snapshot");
        let row = build_row(
            "SOL",
            Some(ticker(100.0, 1.0, 0)),
            Some(ticker(101.0, 2.0, 0)),
            0.2,
        );
        let snapshot = PriceSnapshot::new(VenueId::binance(), VenueId::kraken(), vec![row]);
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let loaded = JsonFileProvider::new(&path).snapshot().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_json_file_provider_keeps_rows_with_bad_prices() {
        let path = temp_path("bad-price");
        std::fs::write(
            &path,
            r#"{"venue_a": "binance", "venue_b": "kraken", "rows": [
                {"asset_symbol": "BTC", "price_a": 50000.0, "price_b": 50300.0,
                 "volume_diff": 20000.0, "volatility": 1.0, "observed_at": "2024-01-01T00:00:00Z"},
                {"asset_symbol": "ETH", "price_a": "n/a", "price_b": 3000.0,
                 "volume_diff": 10.0, "volatility": 0.5, "observed_at": "2024-01-01T00:00:00Z"}
            ]}"#,
        )
        .unwrap();

        let loaded = JsonFileProvider::new(&path).snapshot();
        std::fs::remove_file(&path).ok();

        let snapshot = loaded.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows[0].valid_prices(), Some((50_000.0, 50_300.0)));
        assert_eq!(snapshot.rows[1].price_a, None);
        assert_eq!(snapshot.rows[1].valid_prices(), None);
    }

    #[test]
    fn test_json_file_provider_rejects_broken_json() {
        let path = temp_path("broken");
        std::fs::write(&path, "{\"venue_a\": ").unwrap();

        let loaded = JsonFileProvider::new(&path).snapshot();
        std::fs::remove_file(&path).ok();
        assert!(matches!(loaded, Err(PriceFeedError::InvalidData(_))));
    }

    #[test]
    fn test_json_file_provider_missing_file() {
        let provider = JsonFileProvider::new("/nonexistent/cryptogap.json");
        assert!(matches!(provider.snapshot(), Err(PriceFeedError::SourceUnavailable(_))));
    }
}
