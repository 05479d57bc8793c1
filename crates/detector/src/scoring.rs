//! Opportunity scoring and ranking

use serde::{Deserialize, Serialize};

use cryptogap_core::ArbitrageOpportunity;

const SPREAD_SCALE: f64 = 20.0;  // 5% spread saturates
const VOLUME_SCALE: f64 = 10_000.0;  // 1M imbalance saturates
const VOLATILITY_SCALE: f64 = 10.0;
const MAX_SUB_SCORE: f64 = 100.0;
const MAX_VOLATILITY_PENALTY: f64 = 50.0;

const SPREAD_WEIGHT: f64 = 0.4;
const VOLUME_WEIGHT: f64 = 0.4;
const STABILITY_WEIGHT: f64 = 0.2;

/// Sub-scores behind an opportunity score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub spread_score: f64,
    pub volume_score: f64,
    pub volatility_penalty: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn compute(spread_percent: f64, volume_diff: f64, volatility: f64) -> Self {
        let spread_score = (spread_percent * SPREAD_SCALE).clamp(0.0, MAX_SUB_SCORE);
        let volume_score = (volume_diff / VOLUME_SCALE).clamp(0.0, MAX_SUB_SCORE);
        let volatility_penalty = (volatility * VOLATILITY_SCALE).clamp(0.0, MAX_VOLATILITY_PENALTY);

        let total = spread_score * SPREAD_WEIGHT
            + volume_score * VOLUME_WEIGHT
            + (MAX_SUB_SCORE - volatility_penalty) * STABILITY_WEIGHT;

        Self {
            spread_score,
            volume_score,
            volatility_penalty,
            total,
        }
    }

    pub fn for_opportunity(opp: &ArbitrageOpportunity) -> Self {
        Self::compute(opp.spread_percent, opp.volume_diff, opp.volatility)
    }
}

/// Composite 0-100 desirability score
pub fn opportunity_score(spread_percent: f64, volume_diff: f64, volatility: f64) -> f64 {
    ScoreBreakdown::compute(spread_percent, volume_diff, volatility).total
}

/// Best first. The sort is stable so equal scores keep scan order.
pub fn rank(opportunities: &mut [ArbitrageOpportunity]) {
    opportunities.sort_by(|a, b| b.opportunity_score.total_cmp(&a.opportunity_score));
}
