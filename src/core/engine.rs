use crate::catalog::RegulatorySnapshot;
use crate::core::aggregator::FeeAggregator;
use crate::domain::model::{CalculationRequest, CalculationResult};
use crate::utils::error::Result;

/// Entry point for fee calculations. Holds one immutable regulatory
/// snapshot; calls are independent, so one engine can serve any number of
/// concurrent calculations.
pub struct FeeEngine {
    snapshot: RegulatorySnapshot,
}

impl FeeEngine {
    pub fn new(snapshot: RegulatorySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        tracing::debug!(
            jurisdiction = %request.jurisdiction_code,
            components = request.packaging_data.len(),
            organization = %request.producer_data.organization_id,
            "Starting fee calculation"
        );

        let aggregator = FeeAggregator::new(&self.snapshot);
        let result = aggregator.aggregate(request)?;

        tracing::info!(
            calculation_id = %result.calculation_id,
            jurisdiction = %result.jurisdiction_code,
            total_fee = result.total_fee,
            status = ?result.compliance_status,
            "Fee calculation completed"
        );

        Ok(result)
    }
}
