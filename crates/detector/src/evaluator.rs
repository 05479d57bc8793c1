//! Directional spread and fee-adjusted profit evaluation

use tracing::{trace, warn};

use cryptogap_core::{
    DirectionalCandidate, FeeError, FeeModel, PriceSnapshot, PriceSnapshotRow, ScanConfig,
    TradeDirection,
};

/// Both directional candidates for a row, A->B first.
///
/// Returns `None` for rows the validator would reject, so a zero price can
/// never reach the spread division.
pub fn directional_candidates(
    snapshot: &PriceSnapshot,
    row: &PriceSnapshotRow,
) -> Option<[DirectionalCandidate; 2]> {
    row.valid_prices()?;
    let build = |direction: TradeDirection| {
        let (buy_venue, sell_venue) = snapshot.venues_for(direction);
        let (buy_price, sell_price) = row.prices_for(direction)?;
        Some(DirectionalCandidate::new(
            direction,
            buy_venue.clone(),
            sell_venue.clone(),
            buy_price,
            sell_price,
        ))
    };
    Some([build(TradeDirection::AToB)?, build(TradeDirection::BToA)?])
}

/// Result of evaluating one directional candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Retained {
        candidate: DirectionalCandidate,
        net_profit_per_unit: f64,
    },
    BelowSpread(DirectionalCandidate),
    Unprofitable {
        candidate: DirectionalCandidate,
        net_profit_per_unit: f64,
    },
    FeeFailure {
        candidate: DirectionalCandidate,
        error: FeeError,
    },
}

impl CandidateOutcome {
    pub fn is_retained(&self) -> bool {
        matches!(self, CandidateOutcome::Retained { .. })
    }
}

/// Applies the spread and profit thresholds to candidates
pub struct DirectionalEvaluator<'a> {
    config: &'a ScanConfig,
    fee_model: &'a dyn FeeModel,
}

impl<'a> DirectionalEvaluator<'a> {
    pub fn new(config: &'a ScanConfig, fee_model: &'a dyn FeeModel) -> Self {
        Self { config, fee_model }
    }

    pub fn evaluate(&self, asset: &str, candidate: DirectionalCandidate) -> CandidateOutcome {
        if candidate.spread_percent < self.config.min_spread_threshold {
            trace!(
                asset,
                direction = %candidate.direction,
                spread = candidate.spread_percent,
                "Spread below threshold"
            );
            return CandidateOutcome::BelowSpread(candidate);
        }

        let net_profit_per_unit = match self.net_profit(&candidate) {
            Ok(net) => net,
            Err(error) => {
                warn!(
                    asset,
                    buy_venue = %candidate.buy_venue,
                    sell_venue = %candidate.sell_venue,
                    "Fee model failed, skipping candidate: {}",
                    error
                );
                return CandidateOutcome::FeeFailure { candidate, error };
            }
        };

        // NaN fails this comparison too
        if net_profit_per_unit > self.config.profit_epsilon {
            CandidateOutcome::Retained {
                candidate,
                net_profit_per_unit,
            }
        } else {
            trace!(
                asset,
                direction = %candidate.direction,
                net_profit_per_unit,
                "Not profitable after fees"
            );
            CandidateOutcome::Unprofitable {
                candidate,
                net_profit_per_unit,
            }
        }
    }

    pub fn net_profit(&self, candidate: &DirectionalCandidate) -> Result<f64, FeeError> {
        self.fee_model.net_profit(
            candidate.buy_price,
            candidate.sell_price,
            self.config.trade_amount,
            &candidate.buy_venue,
            &candidate.sell_venue,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cryptogap_core::{FeeResult, VenueFeeModel, VenueId};

    struct FixedProfit(f64);

    impl FeeModel for FixedProfit {
        fn net_profit(&self, _: f64, _: f64, _: f64, _: &VenueId, _: &VenueId) -> FeeResult<f64> {
            Ok(self.0)
        }
    }

    fn snapshot() -> PriceSnapshot {
        PriceSnapshot::new(VenueId::binance(), VenueId::kraken(), vec![])
    }

    fn row(price_a: Option<f64>, price_b: Option<f64>) -> PriceSnapshotRow {
        PriceSnapshotRow::new("BTC", price_a, price_b, 0.0, 0.0, Utc::now())
    }

    fn candidates(price_a: f64, price_b: f64) -> [DirectionalCandidate; 2] {
        directional_candidates(&snapshot(), &row(Some(price_a), Some(price_b))).unwrap()
    }

    #[test]
    fn test_candidates_use_own_denominator() {
        let [a_to_b, b_to_a] = candidates(100.0, 110.0);

        assert_eq!(a_to_b.buy_venue, VenueId::binance());
        assert_eq!(a_to_b.sell_venue, VenueId::kraken());
        assert!((a_to_b.spread_percent - 10.0).abs() < 1e-12);

        assert_eq!(b_to_a.buy_venue, VenueId::kraken());
        assert_eq!(b_to_a.buy_price, 110.0);
        assert!((b_to_a.spread_percent + 100.0 / 11.0).abs() < 1e-9);
        assert!((a_to_b.spread_percent + b_to_a.spread_percent).abs() > 0.5);
    }

    #[test]
    fn test_no_candidates_for_zero_price() {
        assert!(directional_candidates(&snapshot(), &row(Some(0.0), Some(110.0))).is_none());
        assert!(directional_candidates(&snapshot(), &row(Some(100.0), None)).is_none());
    }

    #[test]
    fn test_equal_prices_never_pass_threshold() {
        let config = ScanConfig::default().with_min_spread(0.0001);
        let model = FixedProfit(1.0);
        let evaluator = DirectionalEvaluator::new(&config, &model);

        for candidate in candidates(42.0, 42.0) {
            assert_eq!(candidate.spread_percent, 0.0);
            assert!(matches!(
                evaluator.evaluate("BTC", candidate),
                CandidateOutcome::BelowSpread(_)
            ));
        }
    }

    #[test]
    fn test_profit_must_exceed_epsilon() {
        let config = ScanConfig::default();
        let [candidate, _] = candidates(100.0, 101.0);

        let tiny = FixedProfit(1e-6);
        let outcome = DirectionalEvaluator::new(&config, &tiny).evaluate("BTC", candidate.clone());
        assert!(matches!(outcome, CandidateOutcome::Unprofitable { .. }));

        let nan = FixedProfit(f64::NAN);
        let outcome = DirectionalEvaluator::new(&config, &nan).evaluate("BTC", candidate.clone());
        assert!(!outcome.is_retained());

        let ok = FixedProfit(0.5);
        let outcome = DirectionalEvaluator::new(&config, &ok).evaluate("BTC", candidate);
        assert!(outcome.is_retained());
    }

    #[test]
    fn test_unknown_venue_is_fee_failure() {
        let config = ScanConfig::default();
        let model = VenueFeeModel::reference();
        let evaluator = DirectionalEvaluator::new(&config, &model);
        let snapshot = PriceSnapshot::new(VenueId::new("coinbase"), VenueId::kraken(), vec![]);

        let row = row(Some(100.0), Some(105.0));
        let [a_to_b, _] = directional_candidates(&snapshot, &row).unwrap();
        match evaluator.evaluate("BTC", a_to_b) {
            CandidateOutcome::FeeFailure { error, .. } => {
                assert_eq!(error, FeeError::UnknownVenue(VenueId::new("coinbase")));
            }
            other => panic!("expected fee failure, got {:?}", other),
        }
    }
}
