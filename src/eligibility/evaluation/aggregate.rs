use std::collections::BTreeMap;

use super::super::domain::{EligibilityDecision, RuleId, RuleResult};
use super::super::round2;
use super::config::EngineConfig;

/// Combine per-rule results into the terminal eligibility decision.
///
/// Three independent gates must all hold: no failed mandatory rule, composite
/// score at or above the threshold, and available program budget. The
/// confidence figure rewards evaluation completeness (more rules evaluated),
/// not statistical certainty.
pub(crate) fn aggregate_decision(
    results: &BTreeMap<RuleId, RuleResult>,
    budget_available: bool,
    config: &EngineConfig,
) -> EligibilityDecision {
    let mut failed_mandatory = Vec::new();
    let mut total_score = 0.0;
    let mut total_weight = 0.0;
    let rule_count = results.len();

    for result in results.values() {
        if result.mandatory && !result.passed {
            failed_mandatory.push(result.rule_name.clone());
        }
        total_score += result.score * result.weight;
        total_weight += result.weight;
    }

    // Zero total weight (no rules) resolves to a zero composite, not an error.
    let composite_score = if total_weight > 0.0 {
        total_score / total_weight
    } else {
        0.0
    };

    let eligible = failed_mandatory.is_empty()
        && composite_score >= config.eligibility_threshold
        && budget_available;

    let confidence = (composite_score * config.confidence_score_weight
        + rule_count as f64 * config.confidence_rule_bonus)
        .min(100.0);

    EligibilityDecision {
        eligible,
        composite_score: round2(composite_score),
        confidence: round2(confidence),
        failed_mandatory,
        rules_evaluated: rule_count,
    }
}
