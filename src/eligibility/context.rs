use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AuxiliaryData, ContextValue, PersonAttributes, VulnerabilityDimension, VulnerabilityScore,
};

/// Known context fields, mapped to their canonical names. Rule authors address
/// fields by these strings; unknown names fall back to the auxiliary extension
/// map so programs can ship bespoke fields without an engine release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKey {
    Age,
    Gender,
    MaritalStatus,
    AdministrativeDivision,
    FamilySize,
    DependentsCount,
    HouseholdHead,
    MonthlyIncome,
    EmploymentStatus,
    EducationLevel,
    HealthStatus,
    HousingType,
    HasDisability,
    ChronicIllness,
    VulnerabilityOverall,
    VulnerabilityDimension(VulnerabilityDimension),
}

impl ContextKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContextKey::Age => "age",
            ContextKey::Gender => "gender",
            ContextKey::MaritalStatus => "marital_status",
            ContextKey::AdministrativeDivision => "administrative_division",
            ContextKey::FamilySize => "family_size",
            ContextKey::DependentsCount => "dependents_count",
            ContextKey::HouseholdHead => "household_head",
            ContextKey::MonthlyIncome => "monthly_income",
            ContextKey::EmploymentStatus => "employment_status",
            ContextKey::EducationLevel => "education_level",
            ContextKey::HealthStatus => "health_status",
            ContextKey::HousingType => "housing_type",
            ContextKey::HasDisability => "has_disability",
            ContextKey::ChronicIllness => "chronic_illness",
            ContextKey::VulnerabilityOverall => "vulnerability_score",
            ContextKey::VulnerabilityDimension(dimension) => match dimension {
                VulnerabilityDimension::Demographic => "demographic_score",
                VulnerabilityDimension::Economic => "economic_score",
                VulnerabilityDimension::Social => "social_score",
                VulnerabilityDimension::Health => "health_score",
                VulnerabilityDimension::Geographic => "geographic_score",
            },
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "age" => Some(ContextKey::Age),
            "gender" => Some(ContextKey::Gender),
            "marital_status" => Some(ContextKey::MaritalStatus),
            "administrative_division" => Some(ContextKey::AdministrativeDivision),
            "family_size" => Some(ContextKey::FamilySize),
            "dependents_count" => Some(ContextKey::DependentsCount),
            "household_head" => Some(ContextKey::HouseholdHead),
            "monthly_income" => Some(ContextKey::MonthlyIncome),
            "employment_status" => Some(ContextKey::EmploymentStatus),
            "education_level" => Some(ContextKey::EducationLevel),
            "health_status" => Some(ContextKey::HealthStatus),
            "housing_type" => Some(ContextKey::HousingType),
            "has_disability" => Some(ContextKey::HasDisability),
            "chronic_illness" => Some(ContextKey::ChronicIllness),
            "vulnerability_score" | "overall_score" => Some(ContextKey::VulnerabilityOverall),
            "demographic_score" => Some(ContextKey::VulnerabilityDimension(
                VulnerabilityDimension::Demographic,
            )),
            "economic_score" => Some(ContextKey::VulnerabilityDimension(
                VulnerabilityDimension::Economic,
            )),
            "social_score" => Some(ContextKey::VulnerabilityDimension(
                VulnerabilityDimension::Social,
            )),
            "health_score" => Some(ContextKey::VulnerabilityDimension(
                VulnerabilityDimension::Health,
            )),
            "geographic_score" => Some(ContextKey::VulnerabilityDimension(
                VulnerabilityDimension::Geographic,
            )),
            _ => None,
        }
    }
}

/// Ephemeral field map assembled fresh for one evaluation call. Carries no
/// identity and is never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContext {
    values: BTreeMap<String, ContextValue>,
    pub data_completeness: f64,
    pub as_of: NaiveDate,
}

impl EvaluationContext {
    /// Build the context snapshot from registry attributes plus caller data.
    pub fn assemble(
        person: &PersonAttributes,
        auxiliary: &AuxiliaryData,
        as_of: NaiveDate,
    ) -> Self {
        let mut values = auxiliary.extra.clone();

        values.insert(
            ContextKey::Age.as_str().to_string(),
            ContextValue::Number(f64::from(person.age_on(as_of))),
        );
        values.insert(
            ContextKey::Gender.as_str().to_string(),
            ContextValue::from(person.gender.label()),
        );
        if let Some(status) = person.marital_status {
            values.insert(
                ContextKey::MaritalStatus.as_str().to_string(),
                ContextValue::from(status.label()),
            );
        }
        if let Some(division) = &person.administrative_division {
            values.insert(
                ContextKey::AdministrativeDivision.as_str().to_string(),
                ContextValue::Text(division.clone()),
            );
        }
        values.insert(
            ContextKey::FamilySize.as_str().to_string(),
            ContextValue::Number(f64::from(person.family_size)),
        );
        values.insert(
            ContextKey::DependentsCount.as_str().to_string(),
            ContextValue::Number(f64::from(person.dependents_count)),
        );
        values.insert(
            ContextKey::HouseholdHead.as_str().to_string(),
            ContextValue::Flag(person.household_head),
        );

        if let Some(income) = auxiliary.monthly_income {
            values.insert(
                ContextKey::MonthlyIncome.as_str().to_string(),
                ContextValue::Number(income),
            );
        }
        if let Some(status) = auxiliary.employment_status {
            values.insert(
                ContextKey::EmploymentStatus.as_str().to_string(),
                ContextValue::from(status.label()),
            );
        }
        if let Some(level) = auxiliary.education_level {
            values.insert(
                ContextKey::EducationLevel.as_str().to_string(),
                ContextValue::from(level.label()),
            );
        }
        if let Some(status) = auxiliary.health_status {
            values.insert(
                ContextKey::HealthStatus.as_str().to_string(),
                ContextValue::from(status.label()),
            );
        }
        if let Some(housing) = auxiliary.housing_type {
            values.insert(
                ContextKey::HousingType.as_str().to_string(),
                ContextValue::from(housing.label()),
            );
        }
        values.insert(
            ContextKey::HasDisability.as_str().to_string(),
            ContextValue::Flag(auxiliary.has_disability),
        );
        values.insert(
            ContextKey::ChronicIllness.as_str().to_string(),
            ContextValue::Flag(auxiliary.chronic_illness),
        );

        Self {
            values,
            data_completeness: auxiliary.completeness(),
            as_of,
        }
    }

    pub fn get(&self, field: &str) -> Option<&ContextValue> {
        self.values.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: ContextValue) {
        self.values.insert(field.into(), value);
    }

    /// Resolve a rule field. Vulnerability field names read from the supplied
    /// score; everything else (known or extension) reads from the field map.
    pub fn resolve(
        &self,
        field: &str,
        vulnerability: &VulnerabilityScore,
    ) -> Option<ContextValue> {
        match ContextKey::parse(field) {
            Some(ContextKey::VulnerabilityOverall) => {
                Some(ContextValue::Number(vulnerability.overall))
            }
            Some(ContextKey::VulnerabilityDimension(dimension)) => Some(ContextValue::Number(
                vulnerability.dimension_score(dimension),
            )),
            _ => self.values.get(field).cloned(),
        }
    }
}
