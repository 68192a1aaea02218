mod aggregate;
mod config;
pub(crate) mod operators;

pub use config::EngineConfig;
pub use operators::ComparisonError;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::context::EvaluationContext;
use super::domain::{
    EligibilityDecision, Rule, RuleId, RuleResult, RuleResultDetails, VulnerabilityScore,
};

/// Stateless engine applying a program's rule set to a context snapshot.
///
/// Safe to share across threads and to invoke concurrently: every call reads
/// immutable inputs and returns a freshly constructed outcome.
pub struct EligibilityEngine {
    config: EngineConfig,
}

impl EligibilityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full rule pass and aggregation for one (person, program) pair.
    pub fn evaluate(
        &self,
        rules: &[Rule],
        context: &EvaluationContext,
        vulnerability: &VulnerabilityScore,
        budget_available: bool,
    ) -> EligibilityOutcome {
        let rule_results = self.evaluate_rules(rules, context, vulnerability);
        let decision = aggregate::aggregate_decision(&rule_results, budget_available, &self.config);

        EligibilityOutcome {
            decision,
            rule_results,
        }
    }

    /// Evaluate every active rule in priority order. Failures stay isolated:
    /// a rule that cannot be compared records a failed result and the pass
    /// continues.
    fn evaluate_rules(
        &self,
        rules: &[Rule],
        context: &EvaluationContext,
        vulnerability: &VulnerabilityScore,
    ) -> BTreeMap<RuleId, RuleResult> {
        let mut ordered: Vec<&Rule> = rules.iter().filter(|rule| rule.active).collect();
        ordered.sort_by_key(|rule| rule.priority);

        let mut results = BTreeMap::new();
        for rule in ordered {
            let result = self.evaluate_single(rule, context, vulnerability);
            debug!(
                rule = %rule.name,
                field = %rule.field,
                passed = result.passed,
                score = result.score,
                "rule evaluated"
            );
            results.insert(rule.id.clone(), result);
        }
        results
    }

    fn evaluate_single(
        &self,
        rule: &Rule,
        context: &EvaluationContext,
        vulnerability: &VulnerabilityScore,
    ) -> RuleResult {
        // An explicit null reads the same as an absent field.
        let actual = context
            .resolve(&rule.field, vulnerability)
            .filter(|value| !value.is_null());

        let (passed, error) = match &actual {
            // Fail closed on an absent field, whatever the operator.
            None => (false, None),
            Some(value) => {
                match operators::apply_operator(value, &rule.expected, rule.operator, &self.config)
                {
                    Ok(passed) => (passed, None),
                    Err(comparison) => {
                        warn!(
                            rule = %rule.name,
                            field = %rule.field,
                            operator = rule.operator.label(),
                            %comparison,
                            "comparison failed; rule marked as not passed"
                        );
                        (false, Some(comparison.to_string()))
                    }
                }
            }
        };

        let score = match &actual {
            Some(value) if rule.operator.is_ordered() => {
                operators::graduated_score(value, &rule.expected, rule.operator, passed)
            }
            _ if passed => 100.0,
            _ => 0.0,
        };

        RuleResult {
            rule_name: rule.name.clone(),
            kind: rule.kind,
            mandatory: rule.mandatory,
            weight: rule.weight,
            passed,
            score,
            details: RuleResultDetails {
                actual,
                expected: rule.expected.clone(),
                operator: rule.operator,
            },
            error,
        }
    }
}

/// Decision plus the per-rule audit trail behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub decision: EligibilityDecision,
    pub rule_results: BTreeMap<RuleId, RuleResult>,
}
