use chrono::NaiveDate;
use epr_engine::domain::model::{
    CalculationRequest, PackagingComponent, ProducerData, WeightUnit,
};
use epr_engine::{load_snapshot, ComplianceStatus, EngineError, FeeEngine};
use tempfile::TempDir;

const SNAPSHOT_TOML: &str = r#"
version = "2025.2"

[[jurisdictions]]
code = "OR"
display_name = "Oregon"
catalog_version = "2025.1"
ruleset_version = "2025.1"

[jurisdictions.exemption_thresholds]
max_annual_revenue = 5000000.0
max_annual_tonnage = 1.0

[[jurisdictions]]
code = "CA"
display_name = "California"
catalog_version = "2025.1"
ruleset_version = "2025.1"

[[rates]]
jurisdiction = "OR"
material_type = "PET"
rate_per_kg = 0.0034
effective_from = "2025-01-01"
citation_reference = "ORS 459A.865"

[[rates]]
jurisdiction = "OR"
material_type = "Glass"
rate_per_kg = 0.0012
effective_from = "2025-01-01"
citation_reference = "ORS 459A.865"

[[rates]]
jurisdiction = "CA"
material_type = "PET"
rate_per_kg = 0.0051
effective_from = "2025-01-01"
citation_reference = "SB 54 §42041"

[[rules]]
jurisdiction = "OR"
rule_id = "OR-EM-001"
citation_reference = "OAR 340-090-0230"
effective_from = "2025-01-01"

[rules.predicate]
recyclable = true

[rules.adjustment]
kind = "percentage_discount"
magnitude = 0.25

[[rules]]
jurisdiction = "OR"
rule_id = "OR-EM-002"
citation_reference = "OAR 340-090-0310"
effective_from = "2025-01-01"

[rules.predicate]
contains_pfas = true

[rules.adjustment]
kind = "percentage_penalty"
magnitude = 0.20
"#;

fn engine() -> FeeEngine {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("snapshot.toml");
    std::fs::write(&path, SNAPSHOT_TOML).unwrap();
    FeeEngine::new(load_snapshot(&path).unwrap())
}

fn pet_bottle() -> PackagingComponent {
    PackagingComponent {
        component_name: "Beverage bottle".to_string(),
        material_type: "PET".to_string(),
        weight_per_unit: 450.0,
        weight_unit: WeightUnit::G,
        units_sold: 1000,
        recycled_content_percentage: 0.0,
        recyclable: true,
        reusable: false,
        disrupts_recycling: false,
        contains_pfas: false,
        contains_phthalates: false,
        marine_degradable: false,
        harmful_to_marine_life: false,
        cold_weather_stable: false,
    }
}

fn large_producer() -> ProducerData {
    ProducerData {
        organization_id: "org-42".to_string(),
        annual_revenue: 25_000_000.0,
        annual_tonnage: 120.0,
        small_producer_certified: false,
    }
}

fn request(
    jurisdiction: &str,
    components: Vec<PackagingComponent>,
    producer: ProducerData,
) -> CalculationRequest {
    CalculationRequest {
        jurisdiction_code: jurisdiction.to_string(),
        producer_data: producer,
        packaging_data: components,
        calculation_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        data_source: "integration-test".to_string(),
    }
}

#[test]
fn recyclable_pet_gets_the_oregon_discount() {
    let engine = engine();
    let result = engine
        .calculate(&request("OR", vec![pet_bottle()], large_producer()))
        .unwrap();

    assert_eq!(result.total_fee, 1.1475);
    assert_eq!(result.compliance_status, ComplianceStatus::Compliant);
    assert_eq!(result.currency, "USD");

    let fee = &result.calculation_breakdown.material_fees[0];
    assert!((fee.base_fee - 1.53).abs() < 1e-9);
    assert_eq!(fee.applied_adjustments.len(), 1);
    assert_eq!(fee.applied_adjustments[0].rule_id, "OR-EM-001");

    assert_eq!(
        result.legal_citations,
        vec!["OAR 340-090-0230".to_string(), "ORS 459A.865".to_string()]
    );
}

#[test]
fn glass_jar_rounds_half_to_even_once() {
    let engine = engine();
    let mut jar = pet_bottle();
    jar.component_name = "Jam jar".to_string();
    jar.material_type = "Glass".to_string();
    jar.weight_per_unit = 0.68;
    jar.weight_unit = WeightUnit::Kg;
    jar.units_sold = 1;
    jar.recyclable = false;

    let result = engine
        .calculate(&request("OR", vec![jar], large_producer()))
        .unwrap();

    let fee = &result.calculation_breakdown.material_fees[0];
    assert!((fee.base_fee - 0.000816).abs() < 1e-12);
    assert_eq!(fee.adjusted_fee, 0.0008);
    assert_eq!(result.total_fee, 0.0008);
}

#[test]
fn pfas_penalty_compounds_with_recyclability_discount() {
    let engine = engine();
    let mut bottle = pet_bottle();
    bottle.contains_pfas = true;

    let result = engine
        .calculate(&request("OR", vec![bottle], large_producer()))
        .unwrap();

    // 1.53 -> 1.836 (20% penalty) -> 1.377 (25% discount on the running fee)
    assert_eq!(result.total_fee, 1.377);
    let fee = &result.calculation_breakdown.material_fees[0];
    assert_eq!(fee.applied_adjustments[0].rule_id, "OR-EM-002");
    assert_eq!(fee.applied_adjustments[1].rule_id, "OR-EM-001");
}

#[test]
fn small_producer_with_five_components_is_exempt() {
    let engine = engine();
    let components: Vec<_> = (0..5)
        .map(|i| {
            let mut c = pet_bottle();
            c.component_name = format!("Component {i}");
            c
        })
        .collect();

    let producer = ProducerData {
        organization_id: "org-small".to_string(),
        annual_revenue: 2_000_000.0,
        annual_tonnage: 15.0,
        small_producer_certified: false,
    };

    let result = engine
        .calculate(&request("OR", components, producer))
        .unwrap();

    assert_eq!(result.total_fee, 0.0);
    assert_eq!(result.compliance_status, ComplianceStatus::Exempt);
    assert_eq!(result.calculation_breakdown.material_fees.len(), 5);
}

#[test]
fn missing_rate_fails_the_whole_calculation() {
    let engine = engine();
    let mut foam = pet_bottle();
    foam.material_type = "EPS Foam".to_string();

    let err = engine
        .calculate(&request("OR", vec![pet_bottle(), foam], large_producer()))
        .unwrap_err();

    assert!(matches!(err, EngineError::UnknownMaterialType { .. }));
}

#[test]
fn date_outside_every_rate_window_is_rate_not_found() {
    let engine = engine();
    let mut req = request("OR", vec![pet_bottle()], large_producer());
    req.calculation_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let err = engine.calculate(&req).unwrap_err();
    assert!(matches!(err, EngineError::RateNotFound { .. }));
}

#[test]
fn unknown_jurisdiction_is_rejected() {
    let engine = engine();
    let err = engine
        .calculate(&request("TX", vec![pet_bottle()], large_producer()))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownJurisdiction { .. }));
}

#[test]
fn empty_component_list_is_rejected() {
    let engine = engine();
    let err = engine
        .calculate(&request("OR", vec![], large_producer()))
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyCalculation));
}

#[test]
fn same_component_costs_differently_across_jurisdictions() {
    let engine = engine();

    let oregon = engine
        .calculate(&request("OR", vec![pet_bottle()], large_producer()))
        .unwrap();
    let california = engine
        .calculate(&request("CA", vec![pet_bottle()], large_producer()))
        .unwrap();

    assert_ne!(oregon.total_fee, california.total_fee);
    // CA has no recyclability rule, so the bottle pays the full base fee.
    assert_eq!(california.total_fee, 2.295);
}

#[test]
fn repeated_calculations_are_deterministic() {
    let engine = engine();
    let req = request("OR", vec![pet_bottle()], large_producer());

    let first = engine.calculate(&req).unwrap();
    let second = engine.calculate(&req).unwrap();

    assert_eq!(first.total_fee, second.total_fee);
    assert_eq!(first.legal_citations, second.legal_citations);
    assert_eq!(
        first.calculation_breakdown.material_fees[0].adjusted_fee,
        second.calculation_breakdown.material_fees[0].adjusted_fee
    );
    assert_ne!(first.calculation_id, second.calculation_id);
}

#[test]
fn request_round_trips_through_json() {
    let engine = engine();
    let json = r#"{
        "jurisdiction_code": "OR",
        "producer_data": {
            "organization_id": "org-42",
            "annual_revenue": 25000000.0,
            "annual_tonnage": 120.0
        },
        "packaging_data": [{
            "component_name": "Beverage bottle",
            "material_type": "PET",
            "weight_per_unit": 450.0,
            "weight_unit": "g",
            "units_sold": 1000,
            "recyclable": true
        }],
        "calculation_date": "2025-06-01",
        "data_source": "csv-import"
    }"#;

    let request: CalculationRequest = serde_json::from_str(json).unwrap();
    let result = engine.calculate(&request).unwrap();

    assert_eq!(result.total_fee, 1.1475);
    assert_eq!(result.data_source, "csv-import");

    // The result itself serializes for downstream consumers.
    let serialized = serde_json::to_string(&result).unwrap();
    assert!(serialized.contains("\"compliance_status\":\"compliant\""));
}
