//! Eligibility and vulnerability scoring core.
//!
//! The engine is a pure, synchronous computation: every evaluation receives an
//! immutable rule set and context snapshot and returns a freshly constructed
//! result, so concurrent calls need no locking. Persistence, transport, and
//! caching live behind the narrow traits in [`repository`].

pub mod context;
pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod service;
pub mod vulnerability;

#[cfg(test)]
mod tests;

pub use context::{ContextKey, EvaluationContext};
pub use domain::{
    AuxiliaryData, ContextValue, ContributingFactor, EducationLevel, EligibilityDecision,
    EmploymentStatus, ExpectedValue, Gender, HealthStatus, HousingType, MaritalStatus,
    PersonAttributes, PersonId, ProgramId, ProgramSnapshot, Rule, RuleId, RuleKind, RuleOperator,
    RuleResult, RuleResultDetails, VulnerabilityDimension, VulnerabilityLevel, VulnerabilityScore,
};
pub use evaluation::{ComparisonError, EligibilityEngine, EligibilityOutcome, EngineConfig};
pub use repository::{
    InMemoryProgramCatalog, InMemoryVulnerabilityStore, ProgramDefinition, ProgramRepository,
    RepositoryError, ScoreRecord, VulnerabilityStore,
};
pub use service::{EligibilityService, EvaluationRecord, ServiceError};
pub use vulnerability::{DimensionWeights, VulnerabilityCalculator, VulnerabilityConfig};

/// Two-decimal rounding applied to stored figures; internal computation keeps
/// full precision.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
