use crate::domain::model::ComponentFeeResult;
use std::collections::BTreeSet;

/// Collects every citation that backed the calculation: the rate entry
/// behind each component plus every applied eco-modulation rule.
/// Deduplicated and sorted so repeated runs emit an identical trail.
pub fn legal_citations(material_fees: &[ComponentFeeResult]) -> Vec<String> {
    let mut citations = BTreeSet::new();
    for fee in material_fees {
        if let Some(citation) = &fee.rate_citation {
            citations.insert(citation.clone());
        }
        for adjustment in &fee.applied_adjustments {
            citations.insert(adjustment.citation_reference.clone());
        }
    }
    citations.into_iter().collect()
}
