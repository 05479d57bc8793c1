//! Price snapshot assembly
//!
//! Features:
//! - Venue market symbol mapping
//! - Concurrent latest-ticker state
//! - Close-to-close volatility estimate
//! - Snapshot providers (ticker state, JSON file)
//!
//! Exchange connectivity lives outside this crate; it feeds `TickerState`.

pub mod provider;
pub mod state;
pub mod symbols;
pub mod volatility;

pub use provider::{JsonFileProvider, SnapshotAssembler, SnapshotProvider};
pub use state::{RawTicker, TickerState, VenueTicker};
pub use symbols::{SymbolMapper, SymbolRule};
pub use volatility::close_to_close_volatility;
