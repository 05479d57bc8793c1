//! Latest ticker state per venue and asset
//!
//! Uses DashMap so connectivity tasks can write while snapshots are read

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use cryptogap_core::VenueId;

use crate::volatility::windowed_volatility;

/// Ticker fields as a venue reports them, any of which may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTicker {
    pub last: Option<f64>,
    pub quote_volume: Option<f64>,
    pub base_volume: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub timestamp_ms: Option<i64>,
}

/// Normalized ticker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VenueTicker {
    pub price: f64,
    pub volume: f64,
    pub bid: f64,
    pub ask: f64,
    pub timestamp_ms: i64,
}

impl VenueTicker {
    /// `None` without a last price. Volume prefers quote volume and falls
    /// back to base volume; a missing timestamp becomes `now_ms`.
    pub fn from_raw(raw: &RawTicker, now_ms: i64) -> Option<Self> {
        let price = raw.last.filter(|p| p.is_finite())?;
        let volume = [raw.quote_volume, raw.base_volume]
            .into_iter()
            .flatten()
            .find(|v| v.is_finite() && *v != 0.0)
            .unwrap_or(0.0);

        Some(Self {
            price,
            volume,
            bid: raw.bid.unwrap_or(0.0),
            ask: raw.ask.unwrap_or(0.0),
            timestamp_ms: raw.timestamp_ms.unwrap_or(now_ms),
        })
    }
}

/// Key for ticker lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerKey {
    pub venue: VenueId,
    pub asset: String,
}

impl TickerKey {
    pub fn new(venue: &VenueId, asset: &str) -> Self {
        Self {
            venue: venue.clone(),
            asset: asset.trim().to_ascii_uppercase(),
        }
    }
}

/// Timestamped ticker entry
#[derive(Debug, Clone)]
pub struct TickerEntry {
    pub ticker: VenueTicker,
    pub updated_at: Instant,
}

impl TickerEntry {
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.updated_at.elapsed() > max_age
    }
}

/// Shared ticker and close-price state
#[derive(Debug)]
pub struct TickerState {
    tickers: DashMap<TickerKey, TickerEntry>,
    closes: DashMap<TickerKey, Vec<f64>>,

    update_count: AtomicU64,
    last_update: RwLock<Instant>,
}

impl TickerState {
    pub fn new() -> Self {
        Self {
            tickers: DashMap::new(),
            closes: DashMap::new(),
            update_count: AtomicU64::new(0),
            last_update: RwLock::new(Instant::now()),
        }
    }

    pub fn update_ticker(&self, venue: &VenueId, asset: &str, ticker: VenueTicker) {
        let entry = TickerEntry {
            ticker,
            updated_at: Instant::now(),
        };
        self.tickers.insert(TickerKey::new(venue, asset), entry);
        self.update_count.fetch_add(1, Ordering::Relaxed);
        *self.last_update.write() = Instant::now();
    }

    /// Replace the close series used for volatility
    pub fn update_closes(&self, venue: &VenueId, asset: &str, closes: Vec<f64>) {
        self.closes.insert(TickerKey::new(venue, asset), closes);
    }

    pub fn get_ticker(&self, venue: &VenueId, asset: &str) -> Option<TickerEntry> {
        self.tickers
            .get(&TickerKey::new(venue, asset))
            .map(|r| r.value().clone())
    }

    /// Latest ticker no older than `max_age`
    pub fn fresh_ticker(
        &self,
        venue: &VenueId,
        asset: &str,
        max_age: Duration,
    ) -> Option<VenueTicker> {
        self.get_ticker(venue, asset)
            .filter(|e| !e.is_stale(max_age))
            .map(|e| e.ticker)
    }

    /// 0.0 when no closes are known
    pub fn volatility(&self, venue: &VenueId, asset: &str, window: usize) -> f64 {
        self.closes
            .get(&TickerKey::new(venue, asset))
            .map(|r| windowed_volatility(r.value(), window))
            .unwrap_or(0.0)
    }

    /// Clean up stale tickers
    pub fn cleanup(&self, max_age: Duration) {
        self.tickers.retain(|_, v| !v.is_stale(max_age));
    }

    pub fn stats(&self) -> TickerStateStats {
        TickerStateStats {
            ticker_count: self.tickers.len(),
            series_count: self.closes.len(),
            update_count: self.update_count.load(Ordering::Relaxed),
            last_update_age: self.last_update.read().elapsed(),
        }
    }
}

impl Default for TickerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about ticker state
#[derive(Debug, Clone)]
pub struct TickerStateStats {
    pub ticker_count: usize,
    pub series_count: usize,
    pub update_count: u64,
    pub last_update_age: Duration,
}
