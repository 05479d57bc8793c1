//! Main opportunity scanner

use std::sync::Arc;
use std::time::Instant;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cryptogap_core::{
    ArbitrageOpportunity, CoreResult, FeeModel, PriceSnapshot, PriceSnapshotRow, ScanConfig,
};

use crate::diagnostics::{DirectionDiagnostic, RowDiagnostic};
use crate::evaluator::{directional_candidates, CandidateOutcome, DirectionalEvaluator};
use crate::scoring::{opportunity_score, rank};
use crate::validator;

/// Counters for a single scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub rows_total: usize,
    pub rows_valid: usize,
    pub candidates_evaluated: usize,
    pub below_spread: usize,
    pub fee_failures: usize,
    pub unprofitable: usize,
    pub opportunities: usize,
}

impl ScanStats {
    fn record(&mut self, outcome: &CandidateOutcome) {
        self.candidates_evaluated += 1;
        match outcome {
            CandidateOutcome::Retained { .. } => self.opportunities += 1,
            CandidateOutcome::BelowSpread(_) => self.below_spread += 1,
            CandidateOutcome::Unprofitable { .. } => self.unprofitable += 1,
            CandidateOutcome::FeeFailure { .. } => self.fee_failures += 1,
        }
    }

    fn merge(&mut self, other: &ScanStats) {
        self.candidates_evaluated += other.candidates_evaluated;
        self.below_spread += other.below_spread;
        self.fee_failures += other.fee_failures;
        self.unprofitable += other.unprofitable;
        self.opportunities += other.opportunities;
    }
}

/// Ranked opportunities plus the counters behind them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub stats: ScanStats,
}

impl ScanReport {
    pub fn best(&self) -> Option<&ArbitrageOpportunity> {
        self.opportunities.first()
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

struct RowScan {
    opportunities: Vec<ArbitrageOpportunity>,
    stats: ScanStats,
}

/// Detects, scores and ranks cross-venue opportunities in a snapshot.
///
/// Holds no state between scans; one scanner can serve any number of
/// snapshots, from any number of threads.
pub struct OpportunityScanner {
    config: ScanConfig,
    fee_model: Arc<dyn FeeModel>,
}

impl OpportunityScanner {
    /// Fails if the configuration is unusable.
    pub fn new(config: ScanConfig, fee_model: Arc<dyn FeeModel>) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config, fee_model })
    }

    pub fn with_fee_model<F>(config: ScanConfig, fee_model: F) -> CoreResult<Self>
    where
        F: FeeModel + 'static,
    {
        Self::new(config, Arc::new(fee_model))
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Ranked opportunities, best first. Empty when nothing qualifies.
    pub fn scan(&self, snapshot: &PriceSnapshot) -> CoreResult<Vec<ArbitrageOpportunity>> {
        Ok(self.scan_with_stats(snapshot)?.opportunities)
    }

    pub fn scan_with_stats(&self, snapshot: &PriceSnapshot) -> CoreResult<ScanReport> {
        snapshot.validate()?;
        let start = Instant::now();

        let valid = validator::valid_rows(&snapshot.rows);
        let mut stats = ScanStats {
            rows_total: snapshot.rows.len(),
            rows_valid: valid.len(),
            ..Default::default()
        };

        let row_scans: Vec<RowScan> = if self.config.parallel {
            valid
                .par_iter()
                .map(|row| self.scan_row(snapshot, row))
                .collect()
        } else {
            valid
                .iter()
                .map(|row| self.scan_row(snapshot, row))
                .collect()
        };

        let retained = row_scans.iter().map(|r| r.opportunities.len()).sum();
        let mut opportunities = Vec::with_capacity(retained);
        for row_scan in row_scans {
            stats.merge(&row_scan.stats);
            opportunities.extend(row_scan.opportunities);
        }
        rank(&mut opportunities);

        if opportunities.is_empty() {
            debug!(
                "Scan of {} rows completed in {:?}, no opportunities",
                stats.rows_total,
                start.elapsed()
            );
        } else {
            info!(
                "Found {} opportunities in {} rows in {:?}",
                opportunities.len(),
                stats.rows_total,
                start.elapsed()
            );
        }

        Ok(ScanReport { opportunities, stats })
    }

    fn scan_row(&self, snapshot: &PriceSnapshot, row: &PriceSnapshotRow) -> RowScan {
        let mut stats = ScanStats::default();
        let Some(candidates) = directional_candidates(snapshot, row) else {
            return RowScan { opportunities: vec![], stats };
        };

        let evaluator = DirectionalEvaluator::new(&self.config, self.fee_model.as_ref());
        let opportunities = candidates
            .into_iter()
            .map(|candidate| evaluator.evaluate(&row.asset_symbol, candidate))
            .inspect(|outcome| stats.record(outcome))
            .filter_map(|outcome| match outcome {
                CandidateOutcome::Retained {
                    candidate,
                    net_profit_per_unit,
                } => {
                    let score = opportunity_score(
                        candidate.spread_percent,
                        row.volume_diff,
                        row.volatility,
                    );
                    Some(ArbitrageOpportunity::new(row, candidate, net_profit_per_unit, score))
                }
                _ => None,
            })
            .collect();

        RowScan { opportunities, stats }
    }

    /// Both directions for every valid row, with thresholds reported but not applied
    pub fn diagnose(&self, snapshot: &PriceSnapshot) -> CoreResult<Vec<RowDiagnostic>> {
        snapshot.validate()?;
        let evaluator = DirectionalEvaluator::new(&self.config, self.fee_model.as_ref());

        let diagnostics = validator::valid_rows(&snapshot.rows)
            .into_iter()
            .filter_map(|row| {
                let candidates = directional_candidates(snapshot, row)?;
                let directions = candidates
                    .into_iter()
                    .map(|candidate| {
                        let (net_profit_per_unit, fee_error) =
                            match evaluator.net_profit(&candidate) {
                                Ok(net) => (Some(net), None),
                                Err(e) => (None, Some(e.to_string())),
                            };
                        let passes_spread =
                            candidate.spread_percent >= self.config.min_spread_threshold;
                        DirectionDiagnostic {
                            passes_spread,
                            direction: candidate.direction,
                            buy_venue: candidate.buy_venue,
                            sell_venue: candidate.sell_venue,
                            spread_percent: candidate.spread_percent,
                            net_profit_per_unit,
                            fee_error,
                        }
                    })
                    .collect();
                Some(RowDiagnostic {
                    asset_symbol: row.asset_symbol.clone(),
                    min_spread_threshold: self.config.min_spread_threshold,
                    directions,
                })
            })
            .collect();

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cryptogap_core::{CoreError, TradeDirection, VenueFeeModel, VenueId};

    fn snapshot(rows: Vec<PriceSnapshotRow>) -> PriceSnapshot {
        PriceSnapshot::new(VenueId::binance(), VenueId::kraken(), rows)
    }

    fn row(asset: &str, price_a: f64, price_b: f64) -> PriceSnapshotRow {
        PriceSnapshotRow::new(asset, Some(price_a), Some(price_b), 50_000.0, 0.8, Utc::now())
    }

    fn reference_scanner() -> OpportunityScanner {
        OpportunityScanner::with_fee_model(ScanConfig::default(), VenueFeeModel::reference())
            .unwrap()
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = ScanConfig::default().with_min_spread(-1.0);
        let result = OpportunityScanner::with_fee_model(config, VenueFeeModel::reference());
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_snapshot_fails() {
        let scanner = reference_scanner();
        let bad = PriceSnapshot::new(VenueId::kraken(), VenueId::kraken(), vec![]);
        assert!(matches!(scanner.scan(&bad), Err(CoreError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_empty_scan() {
        let scanner = reference_scanner();
        let report = scanner.scan_with_stats(&snapshot(vec![])).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.stats, ScanStats::default());
    }

    #[test]
    fn test_stats_account_for_every_candidate() {
        let scanner = reference_scanner();
        let mut missing = row("ETH", 3_000.0, 3_000.0);
        missing.price_a = None;
        let report = scanner
            .scan_with_stats(&snapshot(vec![
                row("BTC", 50_000.0, 51_000.0),  // A->B clears fees
                row("SOL", 100.0, 100.2),         // A->B spread 0.2% but fees eat it
                missing,
            ]))
            .unwrap();

        let stats = report.stats;
        assert_eq!(stats.rows_total, 3);
        assert_eq!(stats.rows_valid, 2);
        assert_eq!(stats.candidates_evaluated, 4);
        assert_eq!(stats.below_spread, 2);
        assert_eq!(stats.unprofitable, 1);
        assert_eq!(stats.opportunities, 1);
        assert_eq!(report.best().map(|o| o.asset_symbol.as_str()), Some("BTC"));
    }

    #[test]
    fn test_diagnose_reports_both_directions() {
        let scanner = reference_scanner();
        let diagnostics = scanner.diagnose(&snapshot(vec![row("BTC", 100.0, 110.0)])).unwrap();

        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        let a_to_b = diag.direction(TradeDirection::AToB).unwrap();
        let b_to_a = diag.direction(TradeDirection::BToA).unwrap();
        assert!(a_to_b.passes_spread);
        assert!(!b_to_a.passes_spread);
        assert!(a_to_b.net_profit_per_unit.unwrap() > 0.0);
        assert!(b_to_a.net_profit_per_unit.unwrap() < 0.0);
        assert!(diag.render().contains("binance->kraken spread: 10.000%"));
    }
}
