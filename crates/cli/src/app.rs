//! One scan over one snapshot

use anyhow::Context;
use tracing::info;

use cryptogap_core::{AppConfig, FeeSchedule, VenueFeeModel};
use cryptogap_detector::{OpportunityScanner, ScanReport};
use cryptogap_price_feed::SnapshotProvider;

pub fn build_scanner(config: &AppConfig) -> anyhow::Result<OpportunityScanner> {
    let fee_model = VenueFeeModel::new(FeeSchedule::reference(), config.fees.clone())
        .context("building fee model")?;
    let scanner = OpportunityScanner::with_fee_model(config.scan.clone(), fee_model)?;
    Ok(scanner)
}

/// Pull one snapshot and rank its opportunities
pub fn run(config: &AppConfig, provider: &dyn SnapshotProvider) -> anyhow::Result<ScanReport> {
    let scanner = build_scanner(config)?;
    let snapshot = provider.snapshot().context("loading price snapshot")?;

    info!(
        "Scanning {} rows: {} vs {}, min spread {:.2}%",
        snapshot.len(),
        snapshot.venue_a,
        snapshot.venue_b,
        config.scan.min_spread_threshold
    );

    if config.show_diagnostics {
        for diag in scanner.diagnose(&snapshot)? {
            info!("\n{}", diag.render());
        }
    }

    let report = scanner.scan_with_stats(&snapshot)?;

    if report.is_empty() {
        info!("No arbitrage opportunities met the criteria");
    } else {
        for opp in &report.opportunities {
            info!("{}", opp.summary());
        }
    }
    info!(
        rows = report.stats.rows_total,
        valid = report.stats.rows_valid,
        below_spread = report.stats.below_spread,
        unprofitable = report.stats.unprofitable,
        fee_failures = report.stats.fee_failures,
        "Scan complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cryptogap_core::{PriceFeedResult, PriceSnapshot, PriceSnapshotRow, VenueId};

    struct Fixed(PriceSnapshot);

    impl SnapshotProvider for Fixed {
        fn snapshot(&self) -> PriceFeedResult<PriceSnapshot> {
            Ok(self.0.clone())
        }
    }

    fn provider(rows: Vec<PriceSnapshotRow>) -> Fixed {
        Fixed(PriceSnapshot::new(VenueId::binance(), VenueId::kraken(), rows))
    }

    #[test]
    fn test_run_ranks_opportunities() {
        let now = Utc::now();
        let provider = provider(vec![
            PriceSnapshotRow::new("BTC", Some(50_000.0), Some(50_300.0), 20_000.0, 1.0, now),
            PriceSnapshotRow::new("ETH", Some(3_000.0), Some(3_120.0), 900_000.0, 0.2, now),
            PriceSnapshotRow::new("SOL", None, Some(100.0), 0.0, 0.0, now),
        ]);
        let config = AppConfig {
            show_diagnostics: true,
            ..Default::default()
        };

        let report = run(&config, &provider).unwrap();
        assert_eq!(report.opportunities.len(), 2);
        assert_eq!(report.best().unwrap().asset_symbol, "ETH");
        assert_eq!(report.stats.rows_valid, 2);
    }

    #[test]
    fn test_run_with_nothing_found() {
        let now = Utc::now();
        let row = PriceSnapshotRow::new("BTC", Some(100.0), Some(100.0), 0.0, 0.0, now);
        let provider = provider(vec![row]);
        let report = run(&AppConfig::default(), &provider).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = AppConfig::default();
        config.scan.trade_amount = -1.0;
        assert!(run(&config, &provider(vec![])).is_err());
    }
}
