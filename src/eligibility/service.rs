use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::context::EvaluationContext;
use super::domain::{
    AuxiliaryData, EligibilityDecision, PersonAttributes, PersonId, ProgramId, ProgramSnapshot,
    RuleId, RuleResult, VulnerabilityScore,
};
use super::evaluation::{EligibilityEngine, EngineConfig};
use super::repository::{
    ProgramRepository, RepositoryError, ScoreRecord, VulnerabilityStore,
};
use super::vulnerability::{VulnerabilityCalculator, VulnerabilityConfig};
use std::collections::BTreeMap;

const EVALUATION_VERSION: &str = "1.0";
const DEFAULT_SCORE_MAX_AGE_DAYS: i64 = 30;

/// Full evaluation record assembled for one (person, program) pair: the
/// decision, the per-rule trail, and the context snapshot behind them.
/// Persisting and transporting this record belongs to the calling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub person_id: PersonId,
    pub program_id: ProgramId,
    pub decision: EligibilityDecision,
    pub rule_results: BTreeMap<RuleId, RuleResult>,
    pub vulnerability: VulnerabilityScore,
    pub context: EvaluationContext,
    pub recommendation: String,
    pub evaluated_at: DateTime<Utc>,
    pub evaluation_version: String,
}

/// Error raised by the orchestrating service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("unknown program `{0}`")]
    UnknownProgram(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Orchestrator composing the program repository, the score store, the rule
/// engine, and the vulnerability calculator.
pub struct EligibilityService<P, V> {
    programs: Arc<P>,
    scores: Arc<V>,
    engine: EligibilityEngine,
    calculator: VulnerabilityCalculator,
    score_max_age: Duration,
}

impl<P, V> EligibilityService<P, V>
where
    P: ProgramRepository + 'static,
    V: VulnerabilityStore + 'static,
{
    pub fn new(
        programs: Arc<P>,
        scores: Arc<V>,
        engine_config: EngineConfig,
        vulnerability_config: VulnerabilityConfig,
    ) -> Self {
        Self {
            programs,
            scores,
            engine: EligibilityEngine::new(engine_config),
            calculator: VulnerabilityCalculator::new(vulnerability_config),
            score_max_age: Duration::days(DEFAULT_SCORE_MAX_AGE_DAYS),
        }
    }

    /// Override the freshness window after which a stored vulnerability score
    /// is recomputed.
    pub fn with_score_max_age(mut self, max_age: Duration) -> Self {
        self.score_max_age = max_age;
        self
    }

    /// Evaluate a person against a program: assemble the context, obtain a
    /// fresh vulnerability score, run the rule pass, aggregate the decision,
    /// and return the full record.
    pub fn evaluate(
        &self,
        person: &PersonAttributes,
        auxiliary: &AuxiliaryData,
        program_id: &ProgramId,
        now: DateTime<Utc>,
    ) -> Result<EvaluationRecord, ServiceError> {
        let snapshot = self
            .programs
            .snapshot(program_id)?
            .ok_or_else(|| ServiceError::UnknownProgram(program_id.0.clone()))?;

        let as_of = now.date_naive();
        if !snapshot.is_open_on(as_of) {
            warn!(
                program = %snapshot.code,
                "program window closed or inactive; evaluation proceeds, budget gate still applies"
            );
        }

        let context = EvaluationContext::assemble(person, auxiliary, as_of);
        let vulnerability = self.fresh_vulnerability(person, auxiliary, now)?;
        let rules = self.programs.active_rules(program_id)?;

        let outcome =
            self.engine
                .evaluate(&rules, &context, &vulnerability, snapshot.budget_available());
        let recommendation = recommendation_for(&outcome.decision, &snapshot, self.engine.config());

        info!(
            person = %person.person_id.0,
            program = %snapshot.code,
            eligible = outcome.decision.eligible,
            score = outcome.decision.composite_score,
            "eligibility evaluated"
        );

        Ok(EvaluationRecord {
            person_id: person.person_id.clone(),
            program_id: program_id.clone(),
            decision: outcome.decision,
            rule_results: outcome.rule_results,
            vulnerability,
            context,
            recommendation,
            evaluated_at: now,
            evaluation_version: EVALUATION_VERSION.to_string(),
        })
    }

    /// Recompute and store a person's vulnerability score, replacing any
    /// previous record.
    pub fn refresh_vulnerability(
        &self,
        person: &PersonAttributes,
        auxiliary: &AuxiliaryData,
        now: DateTime<Utc>,
    ) -> Result<VulnerabilityScore, ServiceError> {
        let score = self
            .calculator
            .calculate(person, auxiliary, now.date_naive());
        self.scores.put(ScoreRecord {
            person: person.person_id.clone(),
            score: score.clone(),
            calculated_at: now,
        })?;

        info!(
            person = %person.person_id.0,
            overall = score.overall,
            level = score.level.label(),
            "vulnerability score refreshed"
        );

        Ok(score)
    }

    /// Reuse the stored score when it is fresh enough, otherwise recompute.
    fn fresh_vulnerability(
        &self,
        person: &PersonAttributes,
        auxiliary: &AuxiliaryData,
        now: DateTime<Utc>,
    ) -> Result<VulnerabilityScore, ServiceError> {
        if let Some(record) = self.scores.latest(&person.person_id)? {
            if now - record.calculated_at <= self.score_max_age {
                return Ok(record.score);
            }
        }
        self.refresh_vulnerability(person, auxiliary, now)
    }
}

/// Case-worker-facing summary of the decision, in the spirit of adverse
/// action notices: name the gate that failed.
fn recommendation_for(
    decision: &EligibilityDecision,
    snapshot: &ProgramSnapshot,
    config: &EngineConfig,
) -> String {
    if decision.eligible {
        return format!(
            "Eligible for {} ({}); proceed with enrollment.",
            snapshot.name, snapshot.code
        );
    }

    if !decision.failed_mandatory.is_empty() {
        return format!(
            "Not eligible: mandatory requirements not met ({}).",
            decision.failed_mandatory.join(", ")
        );
    }

    if decision.composite_score >= config.eligibility_threshold && !snapshot.budget_available() {
        return format!(
            "Meets the scoring threshold but {} has exhausted its budget; consider waitlisting.",
            snapshot.code
        );
    }

    format!(
        "Not eligible: composite score {:.2} below the {:.0} threshold.",
        decision.composite_score, config.eligibility_threshold
    )
}
