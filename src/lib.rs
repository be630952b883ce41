pub mod catalog;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::catalog::{EcoModulationRuleset, RateCatalog, RegulatorySnapshot};
pub use crate::config::{load_snapshot, SnapshotConfig};
pub use crate::core::engine::FeeEngine;
pub use crate::domain::model::{CalculationRequest, CalculationResult, ComplianceStatus};
pub use crate::utils::error::{EngineError, Result};
