use crate::catalog::RegulatorySnapshot;
use crate::core::audit;
use crate::core::resolver::ComponentFeeResolver;
use crate::domain::model::{
    CalculationBreakdown, CalculationRequest, CalculationResult, ComplianceStatus, Jurisdiction,
    ProducerData,
};
use crate::utils::error::{EngineError, Result};
use crate::utils::rounding::round_to_places;
use chrono::Utc;
use uuid::Uuid;

const TOTAL_DECIMAL_PLACES: u32 = 4;

pub struct FeeAggregator<'a> {
    snapshot: &'a RegulatorySnapshot,
}

impl<'a> FeeAggregator<'a> {
    pub fn new(snapshot: &'a RegulatorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Resolves every component, sums the adjusted fees, and applies the
    /// producer-level exemption. Any single component failure aborts the
    /// whole calculation; a partial total would be a compliance risk.
    pub fn aggregate(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        if request.packaging_data.is_empty() {
            return Err(EngineError::EmptyCalculation);
        }

        let jurisdiction = self.snapshot.jurisdiction(&request.jurisdiction_code)?;
        let resolver = ComponentFeeResolver::new(&self.snapshot.rates, &self.snapshot.rules);

        let material_fees = request
            .packaging_data
            .iter()
            .map(|component| {
                resolver.resolve(component, &jurisdiction.code, request.calculation_date)
            })
            .collect::<Result<Vec<_>>>()?;

        let base_fee: f64 = material_fees.iter().map(|fee| fee.base_fee).sum();
        let assessed_total: f64 = material_fees.iter().map(|fee| fee.adjusted_fee).sum();

        let exempt = is_exempt(&request.producer_data, jurisdiction);
        let (total_fee, compliance_status) = if exempt {
            (0.0, ComplianceStatus::Exempt)
        } else {
            (
                round_to_places(assessed_total, TOTAL_DECIMAL_PLACES),
                ComplianceStatus::Compliant,
            )
        };

        let legal_citations = audit::legal_citations(&material_fees);
        let adjustments = material_fees
            .iter()
            .flat_map(|fee| fee.applied_adjustments.iter())
            .map(|adjustment| adjustment.delta)
            .sum();

        Ok(CalculationResult {
            calculation_id: Uuid::new_v4().to_string(),
            jurisdiction_code: jurisdiction.code.clone(),
            total_fee,
            currency: jurisdiction.currency.clone(),
            calculation_breakdown: CalculationBreakdown {
                base_fee,
                material_fees,
                adjustments,
            },
            compliance_status,
            legal_citations,
            calculation_timestamp: Utc::now(),
            data_source: request.data_source.clone(),
        })
    }
}

/// A certified small producer, or one under either de-minimis threshold,
/// owes nothing. Components are still resolved so invalid input still fails.
fn is_exempt(producer: &ProducerData, jurisdiction: &Jurisdiction) -> bool {
    if producer.small_producer_certified {
        return true;
    }
    jurisdiction.exemption_thresholds.is_some_and(|thresholds| {
        producer.annual_revenue < thresholds.max_annual_revenue
            || producer.annual_tonnage < thresholds.max_annual_tonnage
    })
}
