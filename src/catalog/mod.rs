pub mod rates;
pub mod rules;

pub use rates::RateCatalog;
pub use rules::EcoModulationRuleset;

use crate::domain::model::Jurisdiction;
use crate::utils::error::{EngineError, Result};
use std::collections::HashMap;

/// One published release of regulatory data. Treated as a read-only value;
/// regulatory updates ship a whole new snapshot rather than editing in place.
#[derive(Debug, Clone, Default)]
pub struct RegulatorySnapshot {
    pub jurisdictions: HashMap<String, Jurisdiction>,
    pub rates: RateCatalog,
    pub rules: EcoModulationRuleset,
}

impl RegulatorySnapshot {
    pub fn jurisdiction(&self, code: &str) -> Result<&Jurisdiction> {
        self.jurisdictions
            .get(code)
            .ok_or_else(|| EngineError::UnknownJurisdiction {
                code: code.to_string(),
            })
    }
}
