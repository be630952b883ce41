use crate::domain::model::RateEntry;
use crate::domain::ports::RateSource;
use crate::utils::error::{EngineError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Versioned, jurisdiction-scoped material rate tables. Built once from a
/// regulatory snapshot and never mutated; updates replace the whole catalog.
#[derive(Debug, Clone, Default)]
pub struct RateCatalog {
    version: String,
    // jurisdiction code -> material type -> dated entries
    tables: HashMap<String, HashMap<String, Vec<RateEntry>>>,
}

impl RateCatalog {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            tables: HashMap::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn insert(&mut self, jurisdiction: impl Into<String>, entry: RateEntry) {
        self.tables
            .entry(jurisdiction.into())
            .or_default()
            .entry(entry.material_type.clone())
            .or_default()
            .push(entry);
    }
}

impl RateSource for RateCatalog {
    fn resolve_rate(
        &self,
        jurisdiction: &str,
        material_type: &str,
        on_date: NaiveDate,
    ) -> Result<&RateEntry> {
        let table = self
            .tables
            .get(jurisdiction)
            .ok_or_else(|| EngineError::UnknownJurisdiction {
                code: jurisdiction.to_string(),
            })?;

        let entries =
            table
                .get(material_type)
                .ok_or_else(|| EngineError::UnknownMaterialType {
                    jurisdiction: jurisdiction.to_string(),
                    material_type: material_type.to_string(),
                })?;

        // Snapshot validation guarantees non-overlapping windows, so the
        // first covering entry is the only one.
        entries
            .iter()
            .find(|entry| entry.covers(on_date))
            .ok_or_else(|| EngineError::RateNotFound {
                jurisdiction: jurisdiction.to_string(),
                material_type: material_type.to_string(),
                on_date,
            })
    }
}
