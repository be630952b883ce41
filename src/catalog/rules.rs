use crate::domain::model::{AdjustmentKind, EcoModulationRule, PackagingComponent};
use crate::domain::ports::RuleSource;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Versioned, jurisdiction-scoped eco-modulation rules. Like the rate
/// catalog, built once from a snapshot and replaced wholesale on updates.
#[derive(Debug, Clone, Default)]
pub struct EcoModulationRuleset {
    version: String,
    rules: HashMap<String, Vec<EcoModulationRule>>,
}

/// Penalties apply before discounts and credits; percentage adjustments
/// compound against the running fee, so this order is part of the contract.
fn application_group(kind: AdjustmentKind) -> u8 {
    match kind {
        AdjustmentKind::PercentagePenalty => 0,
        AdjustmentKind::PercentageDiscount | AdjustmentKind::FlatCredit => 1,
    }
}

impl EcoModulationRuleset {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            rules: HashMap::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn insert(&mut self, jurisdiction: impl Into<String>, rule: EcoModulationRule) {
        self.rules.entry(jurisdiction.into()).or_default().push(rule);
    }

    pub fn rules_for(&self, jurisdiction: &str) -> &[EcoModulationRule] {
        self.rules.get(jurisdiction).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl RuleSource for EcoModulationRuleset {
    fn applicable_rules(
        &self,
        jurisdiction: &str,
        component: &PackagingComponent,
        on_date: NaiveDate,
    ) -> Vec<&EcoModulationRule> {
        let mut applicable: Vec<&EcoModulationRule> = self
            .rules_for(jurisdiction)
            .iter()
            .filter(|rule| rule.covers(on_date) && rule.predicate.matches(component))
            .collect();

        applicable.sort_by(|a, b| {
            application_group(a.adjustment.kind)
                .cmp(&application_group(b.adjustment.kind))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });

        applicable
    }
}
