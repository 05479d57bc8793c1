//! CryptoGap - cross-venue arbitrage scanner
//!
//! Usage: cryptogap [SNAPSHOT_JSON]

use std::env;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cryptogap_cli::{run, settings};
use cryptogap_price_feed::JsonFileProvider;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config_file = env::var("CRYPTOGAP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(settings::DEFAULT_CONFIG_FILE));
    let config = settings::load(&config_file)?;

    init_tracing(config.log_json);
    info!("Starting CryptoGap v{}", env!("CARGO_PKG_VERSION"));

    let snapshot_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.snapshot_path.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no snapshot given: pass a path or set CRYPTOGAP__SNAPSHOT_PATH")
        })?;

    let provider = JsonFileProvider::new(snapshot_path);
    let report = match run(&config, &provider) {
        Ok(report) => report,
        Err(e) => {
            error!("Scan failed: {:#}", e);
            return Err(e);
        }
    };

    println!("{}", serde_json::to_string_pretty(&report.opportunities)?);
    Ok(())
}
