use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier wrapper for registered persons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub String);

/// Identifier wrapper for social programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramId(pub String);

/// Identifier wrapper for eligibility rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub String);

/// Comparison operators available to rule authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Contains,
    Between,
}

impl RuleOperator {
    /// Operators whose numeric comparisons are eligible for graduated scoring.
    pub const fn is_ordered(self) -> bool {
        matches!(
            self,
            RuleOperator::Gt | RuleOperator::Gte | RuleOperator::Lt | RuleOperator::Lte
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            RuleOperator::Eq => "EQ",
            RuleOperator::Ne => "NE",
            RuleOperator::Gt => "GT",
            RuleOperator::Gte => "GTE",
            RuleOperator::Lt => "LT",
            RuleOperator::Lte => "LTE",
            RuleOperator::In => "IN",
            RuleOperator::NotIn => "NOT_IN",
            RuleOperator::Contains => "CONTAINS",
            RuleOperator::Between => "BETWEEN",
        }
    }
}

/// Rule categories mirroring the registry data they inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Demographic,
    Income,
    Geographic,
    Household,
    Health,
    Education,
    Employment,
}

/// Loosely typed value carried by the evaluation context. `Null` is kept as a
/// distinct state so caller documents can carry explicit nulls; the rule pass
/// treats it exactly like an absent field (fail closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Null,
    Flag(bool),
    Number(f64),
    Text(String),
}

impl ContextValue {
    /// Numeric view used by ordered comparisons. Text parses as a real number,
    /// flags coerce to 0/1, anything else is rejected.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ContextValue::Number(value) => Some(*value),
            ContextValue::Text(text) => text.trim().parse().ok(),
            ContextValue::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            ContextValue::Null => None,
        }
    }

    /// Textual rendering used by CONTAINS comparisons.
    pub fn render(&self) -> String {
        match self {
            ContextValue::Null => "null".to_string(),
            ContextValue::Flag(flag) => flag.to_string(),
            ContextValue::Number(value) => value.to_string(),
            ContextValue::Text(text) => text.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ContextValue::Null)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Number(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Flag(value)
    }
}

/// Expected operand of a rule: a scalar, a membership list, or an ordered
/// numeric range. Modeled as a tagged variant so operator dispatch can match
/// exhaustively instead of type-checking at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValue {
    Scalar(ContextValue),
    Range { low: f64, high: f64 },
    List(Vec<ContextValue>),
}

impl ExpectedValue {
    pub fn as_scalar_number(&self) -> Option<f64> {
        match self {
            ExpectedValue::Scalar(value) => value.as_number(),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            ExpectedValue::Scalar(value) => value.render(),
            ExpectedValue::Range { low, high } => format!("[{low}, {high}]"),
            ExpectedValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(ContextValue::render).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_priority() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// A single configurable eligibility condition attached to a program.
///
/// Rules are immutable during an evaluation; `priority` only fixes evaluation
/// (and logging) order, it never changes the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub kind: RuleKind,
    /// Context field inspected by this rule.
    pub field: String,
    pub operator: RuleOperator,
    pub expected: ExpectedValue,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_true")]
    pub mandatory: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Operands recorded alongside each rule outcome for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResultDetails {
    pub actual: Option<ContextValue>,
    pub expected: ExpectedValue,
    pub operator: RuleOperator,
}

/// Outcome of one rule against one context. Produced once per rule per
/// evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule_name: String,
    pub kind: RuleKind,
    pub mandatory: bool,
    pub weight: f64,
    pub passed: bool,
    pub score: f64,
    pub details: RuleResultDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Terminal output of one eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub eligible: bool,
    /// Weighted average of rule scores, rounded to two decimals.
    pub composite_score: f64,
    pub confidence: f64,
    pub failed_mandatory: Vec<String>,
    pub rules_evaluated: usize,
}

/// Gender codes captured by the civil registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Female => "FEMALE",
            Gender::Male => "MALE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "SINGLE",
            MaritalStatus::Married => "MARRIED",
            MaritalStatus::Divorced => "DIVORCED",
            MaritalStatus::Widowed => "WIDOWED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Unemployed,
    Informal,
    PartTime,
    FullTime,
    Retired,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Unemployed => "UNEMPLOYED",
            EmploymentStatus::Informal => "INFORMAL",
            EmploymentStatus::PartTime => "PART_TIME",
            EmploymentStatus::FullTime => "FULL_TIME",
            EmploymentStatus::Retired => "RETIRED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    None,
    PrimaryIncomplete,
    PrimaryComplete,
    Secondary,
    Tertiary,
}

impl EducationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::None => "NONE",
            EducationLevel::PrimaryIncomplete => "PRIMARY_INCOMPLETE",
            EducationLevel::PrimaryComplete => "PRIMARY_COMPLETE",
            EducationLevel::Secondary => "SECONDARY",
            EducationLevel::Tertiary => "TERTIARY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Poor,
    Fair,
    Good,
}

impl HealthStatus {
    pub const fn label(self) -> &'static str {
        match self {
            HealthStatus::Poor => "POOR",
            HealthStatus::Fair => "FAIR",
            HealthStatus::Good => "GOOD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HousingType {
    Homeless,
    Precarious,
    Rental,
    Owned,
}

impl HousingType {
    pub const fn label(self) -> &'static str {
        match self {
            HousingType::Homeless => "HOMELESS",
            HousingType::Precarious => "PRECARIOUS",
            HousingType::Rental => "RENTAL",
            HousingType::Owned => "OWNED",
        }
    }
}

/// Registry-held attributes of a person, as supplied by the context provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonAttributes {
    pub person_id: PersonId,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub administrative_division: Option<String>,
    #[serde(default)]
    pub family_size: u32,
    #[serde(default)]
    pub dependents_count: u32,
    #[serde(default)]
    pub household_head: bool,
}

impl PersonAttributes {
    /// Whole years between the birth date and `as_of`.
    pub fn age_on(&self, as_of: NaiveDate) -> u32 {
        let mut age = as_of.year() - self.date_of_birth.year();
        if (as_of.month(), as_of.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }
}

/// Caller-supplied socio-economic fields complementing the registry record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryData {
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
    #[serde(default)]
    pub education_level: Option<EducationLevel>,
    #[serde(default)]
    pub health_status: Option<HealthStatus>,
    #[serde(default)]
    pub housing_type: Option<HousingType>,
    #[serde(default)]
    pub has_disability: bool,
    #[serde(default)]
    pub chronic_illness: bool,
    /// Extension fields for program-specific rules; known fields win on clash.
    #[serde(default)]
    pub extra: BTreeMap<String, ContextValue>,
}

impl AuxiliaryData {
    /// Share of the five optional socio-economic fields that are populated.
    pub fn completeness(&self) -> f64 {
        let populated = [
            self.monthly_income.is_some(),
            self.employment_status.is_some(),
            self.education_level.is_some(),
            self.health_status.is_some(),
            self.housing_type.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        populated as f64 / 5.0
    }
}

/// The five independent vulnerability dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityDimension {
    Demographic,
    Economic,
    Social,
    Health,
    Geographic,
}

impl VulnerabilityDimension {
    pub const ALL: [VulnerabilityDimension; 5] = [
        VulnerabilityDimension::Demographic,
        VulnerabilityDimension::Economic,
        VulnerabilityDimension::Social,
        VulnerabilityDimension::Health,
        VulnerabilityDimension::Geographic,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            VulnerabilityDimension::Demographic => "demographic",
            VulnerabilityDimension::Economic => "economic",
            VulnerabilityDimension::Social => "social",
            VulnerabilityDimension::Health => "health",
            VulnerabilityDimension::Geographic => "geographic",
        }
    }
}

/// Classification bands for the overall vulnerability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VulnerabilityLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl VulnerabilityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            VulnerabilityLevel::Low => "LOW",
            VulnerabilityLevel::Moderate => "MODERATE",
            VulnerabilityLevel::High => "HIGH",
            VulnerabilityLevel::Critical => "CRITICAL",
        }
    }
}

/// A dimension significant enough to explain the overall classification.
/// Case workers should read this list rather than the raw dimension scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingFactor {
    pub dimension: VulnerabilityDimension,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Multi-dimensional vulnerability score for one person. Latest wins: a
/// recomputation replaces the previous score at the storage boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityScore {
    pub overall: f64,
    pub demographic: f64,
    pub economic: f64,
    pub social: f64,
    pub health: f64,
    pub geographic: f64,
    pub level: VulnerabilityLevel,
    pub contributing_factors: Vec<ContributingFactor>,
    pub confidence: f64,
    pub calculation_version: String,
}

impl VulnerabilityScore {
    pub fn dimension_score(&self, dimension: VulnerabilityDimension) -> f64 {
        match dimension {
            VulnerabilityDimension::Demographic => self.demographic,
            VulnerabilityDimension::Economic => self.economic,
            VulnerabilityDimension::Social => self.social,
            VulnerabilityDimension::Health => self.health,
            VulnerabilityDimension::Geographic => self.geographic,
        }
    }
}

/// Read-only view of a program consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    pub program_id: ProgramId,
    pub name: String,
    pub code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_true")]
    pub active: bool,
    pub total_budget: f64,
    #[serde(default)]
    pub allocated_budget: f64,
    #[serde(default)]
    pub benefit_amount: Option<f64>,
    #[serde(default)]
    pub max_beneficiaries: Option<u32>,
    #[serde(default)]
    pub current_beneficiaries: u32,
}

impl ProgramSnapshot {
    /// Budget gate consumed by the decision aggregator.
    pub fn budget_available(&self) -> bool {
        self.allocated_budget < self.total_budget
    }

    pub fn budget_utilization(&self) -> f64 {
        if self.total_budget == 0.0 {
            return 0.0;
        }
        self.allocated_budget / self.total_budget
    }

    /// Whether the program window covers `date` and the program is switched on.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.active && self.start_date <= date && date <= self.end_date
    }
}
