//! Snapshot validation

use tracing::debug;

use cryptogap_core::PriceSnapshotRow;

/// Rows usable for evaluation, in their original order.
///
/// Incomplete rows are data-quality skips, not errors.
pub fn valid_rows(rows: &[PriceSnapshotRow]) -> Vec<&PriceSnapshotRow> {
    rows.iter().filter(|row| is_eligible(row)).collect()
}

pub fn is_eligible(row: &PriceSnapshotRow) -> bool {
    if row.valid_prices().is_none() {
        debug!(
            asset = %row.asset_symbol,
            price_a = ?row.price_a,
            price_b = ?row.price_b,
            "Skipping row without valid prices"
        );
        return false;
    }
    if !row.has_valid_metrics() {
        debug!(
            asset = %row.asset_symbol,
            volume_diff = row.volume_diff,
            volatility = row.volatility,
            "Skipping row with invalid volume or volatility"
        );
        return false;
    }
    true
}
