use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::eligibility::domain::{
    AuxiliaryData, ContextValue, ExpectedValue, Gender, PersonAttributes, PersonId, ProgramId,
    ProgramSnapshot, Rule, RuleId, RuleKind, RuleOperator, VulnerabilityLevel, VulnerabilityScore,
};
use crate::eligibility::evaluation::{EligibilityEngine, EngineConfig};
use crate::eligibility::repository::{
    InMemoryProgramCatalog, InMemoryVulnerabilityStore, ProgramDefinition,
};
use crate::eligibility::service::EligibilityService;
use crate::eligibility::vulnerability::{VulnerabilityCalculator, VulnerabilityConfig};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date")
}

pub(super) fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).single().expect("valid instant")
}

pub(super) fn person() -> PersonAttributes {
    PersonAttributes {
        person_id: PersonId("person-001".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(2000, 6, 1).expect("valid date"),
        gender: Gender::Male,
        marital_status: None,
        administrative_division: Some("ESTUAIRE".to_string()),
        family_size: 4,
        dependents_count: 0,
        household_head: false,
    }
}

pub(super) fn auxiliary_with_income(monthly_income: f64) -> AuxiliaryData {
    AuxiliaryData {
        monthly_income: Some(monthly_income),
        ..AuxiliaryData::default()
    }
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(EngineConfig::default())
}

pub(super) fn calculator() -> VulnerabilityCalculator {
    let mut rural_divisions = BTreeSet::new();
    rural_divisions.insert("NYANGA".to_string());
    rural_divisions.insert("OGOOUE-LOLO".to_string());
    VulnerabilityCalculator::new(VulnerabilityConfig {
        rural_divisions,
        ..VulnerabilityConfig::default()
    })
}

/// Neutral vulnerability input for rule-engine tests that do not exercise
/// vulnerability-backed fields.
pub(super) fn zero_vulnerability() -> VulnerabilityScore {
    VulnerabilityScore {
        overall: 0.0,
        demographic: 0.0,
        economic: 0.0,
        social: 0.0,
        health: 0.0,
        geographic: 0.0,
        level: VulnerabilityLevel::Low,
        contributing_factors: Vec::new(),
        confidence: 50.0,
        calculation_version: "1.0".to_string(),
    }
}

pub(super) fn rule(
    id: &str,
    name: &str,
    field: &str,
    operator: RuleOperator,
    expected: ExpectedValue,
) -> Rule {
    Rule {
        id: RuleId(id.to_string()),
        name: name.to_string(),
        kind: RuleKind::Demographic,
        field: field.to_string(),
        operator,
        expected,
        weight: 1.0,
        priority: 1,
        mandatory: false,
        active: true,
    }
}

pub(super) fn number(value: f64) -> ExpectedValue {
    ExpectedValue::Scalar(ContextValue::Number(value))
}

pub(super) fn text(value: &str) -> ExpectedValue {
    ExpectedValue::Scalar(ContextValue::Text(value.to_string()))
}

/// The reference rule set used across aggregation tests: a mandatory adult-age
/// gate (weight 2) and a graduated income ceiling (weight 1).
pub(super) fn reference_rules() -> Vec<Rule> {
    let mut age = rule("rule-age", "minimum_age", "age", RuleOperator::Gte, number(18.0));
    age.kind = RuleKind::Demographic;
    age.weight = 2.0;
    age.mandatory = true;

    let mut income = rule(
        "rule-income",
        "income_ceiling",
        "monthly_income",
        RuleOperator::Lte,
        number(75_000.0),
    );
    income.kind = RuleKind::Income;
    income.priority = 2;

    vec![age, income]
}

pub(super) fn program_snapshot(budget_available: bool) -> ProgramSnapshot {
    ProgramSnapshot {
        program_id: ProgramId("prog-cash-001".to_string()),
        name: "Emergency Cash Transfer".to_string(),
        code: "ECT".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
        active: true,
        total_budget: 1_000_000.0,
        allocated_budget: if budget_available { 250_000.0 } else { 1_000_000.0 },
        benefit_amount: Some(50_000.0),
        max_beneficiaries: Some(200),
        current_beneficiaries: 5,
    }
}

pub(super) fn program_definition(budget_available: bool) -> ProgramDefinition {
    ProgramDefinition {
        snapshot: program_snapshot(budget_available),
        rules: reference_rules(),
    }
}

pub(super) type TestService = EligibilityService<InMemoryProgramCatalog, InMemoryVulnerabilityStore>;

pub(super) fn service(
    definition: ProgramDefinition,
) -> (TestService, Arc<InMemoryVulnerabilityStore>) {
    let store = Arc::new(InMemoryVulnerabilityStore::default());
    let service = EligibilityService::new(
        Arc::new(InMemoryProgramCatalog::new(vec![definition])),
        Arc::clone(&store),
        EngineConfig::default(),
        VulnerabilityConfig::default(),
    );
    (service, store)
}
