use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub code: String,
    pub display_name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub catalog_version: String,
    pub ruleset_version: String,
    #[serde(default)]
    pub exemption_thresholds: Option<ExemptionThresholds>,
}

/// De-minimis thresholds. A producer below either one owes no fee.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExemptionThresholds {
    pub max_annual_revenue: f64,
    pub max_annual_tonnage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateEntry {
    pub material_type: String,
    pub rate_per_kg: f64,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(default)]
    pub citation_reference: Option<String>,
}

impl RateEntry {
    /// Half-open window: effective on `effective_from`, expired on `effective_to`.
    pub fn covers(&self, on_date: NaiveDate) -> bool {
        self.effective_from <= on_date && self.effective_to.map_or(true, |to| on_date < to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    PercentagePenalty,
    PercentageDiscount,
    FlatCredit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    /// Fraction for percentage kinds (0.25 = 25%), currency amount for flat credits.
    pub magnitude: f64,
}

/// All-of match over component attributes. Unset fields match anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulePredicate {
    #[serde(default)]
    pub recyclable: Option<bool>,
    #[serde(default)]
    pub reusable: Option<bool>,
    #[serde(default)]
    pub contains_pfas: Option<bool>,
    #[serde(default)]
    pub contains_phthalates: Option<bool>,
    #[serde(default)]
    pub disrupts_recycling: Option<bool>,
    #[serde(default)]
    pub marine_degradable: Option<bool>,
    #[serde(default)]
    pub harmful_to_marine_life: Option<bool>,
    #[serde(default)]
    pub min_pcr_content: Option<f64>,
    #[serde(default)]
    pub max_pcr_content: Option<f64>,
}

impl RulePredicate {
    pub fn matches(&self, component: &PackagingComponent) -> bool {
        fn check(expected: Option<bool>, actual: bool) -> bool {
            expected.map_or(true, |e| e == actual)
        }

        check(self.recyclable, component.recyclable)
            && check(self.reusable, component.reusable)
            && check(self.contains_pfas, component.contains_pfas)
            && check(self.contains_phthalates, component.contains_phthalates)
            && check(self.disrupts_recycling, component.disrupts_recycling)
            && check(self.marine_degradable, component.marine_degradable)
            && check(self.harmful_to_marine_life, component.harmful_to_marine_life)
            && self
                .min_pcr_content
                .map_or(true, |min| component.recycled_content_percentage >= min)
            && self
                .max_pcr_content
                .map_or(true, |max| component.recycled_content_percentage <= max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcoModulationRule {
    pub rule_id: String,
    pub predicate: RulePredicate,
    pub adjustment: Adjustment,
    pub citation_reference: String,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl EcoModulationRule {
    pub fn covers(&self, on_date: NaiveDate) -> bool {
        self.effective_from <= on_date && self.effective_to.map_or(true, |to| on_date < to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    G,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingComponent {
    pub component_name: String,
    pub material_type: String,
    pub weight_per_unit: f64,
    pub weight_unit: WeightUnit,
    pub units_sold: i64,
    #[serde(default)]
    pub recycled_content_percentage: f64,
    #[serde(default)]
    pub recyclable: bool,
    #[serde(default)]
    pub reusable: bool,
    #[serde(default)]
    pub disrupts_recycling: bool,
    #[serde(default)]
    pub contains_pfas: bool,
    #[serde(default)]
    pub contains_phthalates: bool,
    #[serde(default)]
    pub marine_degradable: bool,
    #[serde(default)]
    pub harmful_to_marine_life: bool,
    #[serde(default)]
    pub cold_weather_stable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerData {
    pub organization_id: String,
    pub annual_revenue: f64,
    pub annual_tonnage: f64,
    #[serde(default)]
    pub small_producer_certified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub jurisdiction_code: String,
    pub producer_data: ProducerData,
    pub packaging_data: Vec<PackagingComponent>,
    pub calculation_date: NaiveDate,
    #[serde(default)]
    pub data_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    pub rule_id: String,
    pub kind: AdjustmentKind,
    /// Signed difference from the pre-adjustment fee.
    pub delta: f64,
    pub citation_reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentFeeResult {
    pub component_name: String,
    pub material_type: String,
    pub weight_kg: f64,
    pub rate_per_kg: f64,
    pub rate_citation: Option<String>,
    pub base_fee: f64,
    pub applied_adjustments: Vec<AppliedAdjustment>,
    pub adjusted_fee: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Compliant,
    Exempt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationBreakdown {
    pub base_fee: f64,
    /// One entry per submitted component, in input order.
    pub material_fees: Vec<ComponentFeeResult>,
    pub adjustments: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub calculation_id: String,
    pub jurisdiction_code: String,
    pub total_fee: f64,
    pub currency: String,
    pub calculation_breakdown: CalculationBreakdown,
    pub compliance_status: ComplianceStatus,
    pub legal_citations: Vec<String>,
    pub calculation_timestamp: DateTime<Utc>,
    pub data_source: String,
}
