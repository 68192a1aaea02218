use serde::{Deserialize, Serialize};

/// Aggregation thresholds and policy dials for the rule engine. Deployment
/// configuration injects these at construction; scoring code never reads
/// literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum composite score for a positive decision.
    pub eligibility_threshold: f64,
    /// Composite-score term of the confidence formula.
    pub confidence_score_weight: f64,
    /// Per-rule completeness bonus of the confidence formula.
    pub confidence_rule_bonus: f64,
    /// NOT_IN against a non-list operand passes vacuously when set. Matches the
    /// historical registry behavior; switch off to fail closed like IN does.
    pub vacuous_not_in: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eligibility_threshold: 60.0,
            confidence_score_weight: 0.8,
            confidence_rule_bonus: 2.0,
            vacuous_not_in: true,
        }
    }
}
