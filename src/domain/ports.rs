use crate::domain::model::{EcoModulationRule, PackagingComponent, RateEntry};
use crate::utils::error::Result;
use chrono::NaiveDate;

pub trait RateSource: Send + Sync {
    /// Exact-string material lookup; no cross-jurisdiction fallback.
    fn resolve_rate(
        &self,
        jurisdiction: &str,
        material_type: &str,
        on_date: NaiveDate,
    ) -> Result<&RateEntry>;
}

pub trait RuleSource: Send + Sync {
    /// Rules whose window covers `on_date` and whose predicate matches,
    /// in application order: penalties first, then discounts and credits,
    /// ascending rule_id within each group.
    fn applicable_rules(
        &self,
        jurisdiction: &str,
        component: &PackagingComponent,
        on_date: NaiveDate,
    ) -> Vec<&EcoModulationRule>;
}
