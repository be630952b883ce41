use anyhow::Context;
use clap::Parser;
use epr_engine::domain::model::CalculationRequest;
use epr_engine::utils::logger;
use epr_engine::{load_snapshot, CliConfig, FeeEngine};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_service_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting epr-engine CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let snapshot = load_snapshot(&config.snapshot)
        .with_context(|| format!("Failed to load snapshot from {}", config.snapshot.display()))?;
    tracing::info!(
        jurisdictions = snapshot.jurisdictions.len(),
        version = snapshot.rates.version(),
        "Regulatory snapshot loaded"
    );

    let request_json = std::fs::read_to_string(&config.request)
        .with_context(|| format!("Failed to read request from {}", config.request.display()))?;
    let request: CalculationRequest =
        serde_json::from_str(&request_json).context("Request JSON is malformed")?;

    let engine = FeeEngine::new(snapshot);
    match engine.calculate(&request) {
        Ok(result) => {
            let output = if config.pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{output}");
        }
        Err(e) => {
            tracing::error!("Fee calculation failed: {e}");
            eprintln!("Fee calculation failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
