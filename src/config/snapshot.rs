use crate::catalog::{EcoModulationRuleset, RateCatalog, RegulatorySnapshot};
use crate::domain::model::{
    Adjustment, AdjustmentKind, EcoModulationRule, Jurisdiction, RateEntry, RulePredicate,
};
use crate::utils::error::{EngineError, Result};
use crate::utils::validation::{
    validate_fraction, validate_non_empty_string, validate_positive, Validate,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// TOML document shape for a published regulatory snapshot. Dates are
/// quoted ISO-8601 strings (`"2025-01-01"`).
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    pub version: String,
    pub jurisdictions: Vec<Jurisdiction>,
    #[serde(default)]
    pub rates: Vec<RateRow>,
    #[serde(default)]
    pub rules: Vec<RuleRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateRow {
    pub jurisdiction: String,
    pub material_type: String,
    pub rate_per_kg: f64,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(default)]
    pub citation_reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleRow {
    pub jurisdiction: String,
    pub rule_id: String,
    pub predicate: RulePredicate,
    pub adjustment: Adjustment,
    pub citation_reference: String,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl SnapshotConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SnapshotConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validates, then builds the immutable snapshot the engine runs on.
    pub fn into_snapshot(self) -> Result<RegulatorySnapshot> {
        self.validate()?;

        let mut jurisdictions = HashMap::new();
        for jurisdiction in self.jurisdictions {
            jurisdictions.insert(jurisdiction.code.clone(), jurisdiction);
        }

        let mut rates = RateCatalog::new(self.version.clone());
        for row in self.rates {
            rates.insert(
                row.jurisdiction,
                RateEntry {
                    material_type: row.material_type,
                    rate_per_kg: row.rate_per_kg,
                    effective_from: row.effective_from,
                    effective_to: row.effective_to,
                    citation_reference: row.citation_reference,
                },
            );
        }

        let mut rules = EcoModulationRuleset::new(self.version);
        for row in self.rules {
            rules.insert(
                row.jurisdiction,
                EcoModulationRule {
                    rule_id: row.rule_id,
                    predicate: row.predicate,
                    adjustment: row.adjustment,
                    citation_reference: row.citation_reference,
                    effective_from: row.effective_from,
                    effective_to: row.effective_to,
                },
            );
        }

        Ok(RegulatorySnapshot {
            jurisdictions,
            rates,
            rules,
        })
    }
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<RegulatorySnapshot> {
    SnapshotConfig::from_file(path)?.into_snapshot()
}

impl Validate for SnapshotConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("version", &self.version)?;

        let mut codes = HashSet::new();
        for jurisdiction in &self.jurisdictions {
            validate_non_empty_string("jurisdictions.code", &jurisdiction.code)?;
            validate_non_empty_string("jurisdictions.display_name", &jurisdiction.display_name)?;
            if !codes.insert(jurisdiction.code.as_str()) {
                return Err(EngineError::InvalidSnapshot {
                    message: format!("Duplicate jurisdiction code: {}", jurisdiction.code),
                });
            }
        }

        for row in &self.rates {
            if !codes.contains(row.jurisdiction.as_str()) {
                return Err(EngineError::InvalidSnapshot {
                    message: format!("Rate references undeclared jurisdiction: {}", row.jurisdiction),
                });
            }
            validate_non_empty_string("rates.material_type", &row.material_type)?;
            validate_positive("rates.rate_per_kg", row.rate_per_kg)?;
            validate_window(&row.jurisdiction, row.effective_from, row.effective_to)?;
        }
        validate_no_overlapping_windows(&self.rates)?;

        let mut rule_ids = HashSet::new();
        for row in &self.rules {
            if !codes.contains(row.jurisdiction.as_str()) {
                return Err(EngineError::InvalidSnapshot {
                    message: format!("Rule references undeclared jurisdiction: {}", row.jurisdiction),
                });
            }
            validate_non_empty_string("rules.rule_id", &row.rule_id)?;
            validate_non_empty_string("rules.citation_reference", &row.citation_reference)?;
            if !rule_ids.insert((row.jurisdiction.as_str(), row.rule_id.as_str())) {
                return Err(EngineError::InvalidSnapshot {
                    message: format!(
                        "Duplicate rule id {} in jurisdiction {}",
                        row.rule_id, row.jurisdiction
                    ),
                });
            }
            match row.adjustment.kind {
                AdjustmentKind::PercentageDiscount | AdjustmentKind::PercentagePenalty => {
                    validate_fraction("rules.adjustment.magnitude", row.adjustment.magnitude)?;
                }
                AdjustmentKind::FlatCredit => {
                    validate_positive("rules.adjustment.magnitude", row.adjustment.magnitude)?;
                }
            }
            validate_window(&row.jurisdiction, row.effective_from, row.effective_to)?;
        }

        Ok(())
    }
}

fn validate_window(
    jurisdiction: &str,
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> Result<()> {
    if let Some(to) = to {
        if to <= from {
            return Err(EngineError::InvalidSnapshot {
                message: format!(
                    "Effective window in {jurisdiction} ends ({to}) before it starts ({from})"
                ),
            });
        }
    }
    Ok(())
}

/// At most one rate may be effective per (jurisdiction, material, date).
fn validate_no_overlapping_windows(rates: &[RateRow]) -> Result<()> {
    let mut grouped: HashMap<(&str, &str), Vec<&RateRow>> = HashMap::new();
    for row in rates {
        grouped
            .entry((row.jurisdiction.as_str(), row.material_type.as_str()))
            .or_default()
            .push(row);
    }

    for ((jurisdiction, material), mut rows) in grouped {
        rows.sort_by_key(|row| row.effective_from);
        for pair in rows.windows(2) {
            let earlier_end = pair[0].effective_to;
            let later_start = pair[1].effective_from;
            let overlaps = match earlier_end {
                None => true, // open-ended window swallows everything after it
                Some(end) => later_start < end,
            };
            if overlaps {
                return Err(EngineError::InvalidSnapshot {
                    message: format!(
                        "Overlapping rate windows for {material} in {jurisdiction} around {later_start}"
                    ),
                });
            }
        }
    }
    Ok(())
}
