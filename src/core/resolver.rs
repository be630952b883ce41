use crate::domain::model::{
    AdjustmentKind, AppliedAdjustment, ComponentFeeResult, PackagingComponent, WeightUnit,
};
use crate::domain::ports::{RateSource, RuleSource};
use crate::utils::error::{EngineError, Result};
use crate::utils::rounding::round_to_places;
use chrono::NaiveDate;

/// Matches the `$X.XXXX/kg` precision of published rate schedules.
const FEE_DECIMAL_PLACES: u32 = 4;

pub struct ComponentFeeResolver<'a, R: RateSource, M: RuleSource> {
    rates: &'a R,
    rules: &'a M,
}

impl<'a, R: RateSource, M: RuleSource> ComponentFeeResolver<'a, R, M> {
    pub fn new(rates: &'a R, rules: &'a M) -> Self {
        Self { rates, rules }
    }

    pub fn resolve(
        &self,
        component: &PackagingComponent,
        jurisdiction: &str,
        on_date: NaiveDate,
    ) -> Result<ComponentFeeResult> {
        let weight_kg = normalized_weight_kg(component)?;

        let rate = self
            .rates
            .resolve_rate(jurisdiction, &component.material_type, on_date)?;
        let base_fee = weight_kg * rate.rate_per_kg;

        let mut adjusted_fee = base_fee;
        let mut applied_adjustments = Vec::new();
        for rule in self.rules.applicable_rules(jurisdiction, component, on_date) {
            let before = adjusted_fee;
            adjusted_fee = match rule.adjustment.kind {
                AdjustmentKind::PercentagePenalty => before * (1.0 + rule.adjustment.magnitude),
                AdjustmentKind::PercentageDiscount => {
                    (before * (1.0 - rule.adjustment.magnitude)).max(0.0)
                }
                AdjustmentKind::FlatCredit => (before - rule.adjustment.magnitude).max(0.0),
            };
            applied_adjustments.push(AppliedAdjustment {
                rule_id: rule.rule_id.clone(),
                kind: rule.adjustment.kind,
                delta: adjusted_fee - before,
                citation_reference: rule.citation_reference.clone(),
            });
        }

        // One rounding step at the very end; intermediate values stay exact
        // so chained adjustments cannot compound rounding error.
        Ok(ComponentFeeResult {
            component_name: component.component_name.clone(),
            material_type: component.material_type.clone(),
            weight_kg,
            rate_per_kg: rate.rate_per_kg,
            rate_citation: rate.citation_reference.clone(),
            base_fee,
            applied_adjustments,
            adjusted_fee: round_to_places(adjusted_fee, FEE_DECIMAL_PLACES),
        })
    }
}

fn normalized_weight_kg(component: &PackagingComponent) -> Result<f64> {
    if !component.weight_per_unit.is_finite() || component.weight_per_unit <= 0.0 {
        return Err(EngineError::InvalidWeight {
            component_name: component.component_name.clone(),
            reason: format!(
                "weight_per_unit must be positive, got {}",
                component.weight_per_unit
            ),
        });
    }
    if component.units_sold < 0 {
        return Err(EngineError::InvalidWeight {
            component_name: component.component_name.clone(),
            reason: format!("units_sold cannot be negative, got {}", component.units_sold),
        });
    }

    let per_unit_kg = match component.weight_unit {
        WeightUnit::Kg => component.weight_per_unit,
        WeightUnit::G => component.weight_per_unit / 1000.0,
    };
    Ok(per_unit_kg * component.units_sold as f64)
}
