use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "epr-engine")]
#[command(about = "Multi-jurisdiction EPR packaging fee calculator")]
pub struct CliConfig {
    /// Regulatory snapshot (TOML): jurisdictions, rate tables, eco-modulation rules
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Calculation request (JSON)
    #[arg(long)]
    pub request: PathBuf,

    /// Pretty-print the result JSON
    #[arg(long)]
    pub pretty: bool,

    /// Emit JSON log lines instead of the compact format (for headless runs)
    #[arg(long)]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
