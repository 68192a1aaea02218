use super::super::domain::{ContextValue, ExpectedValue, RuleOperator};
use super::config::EngineConfig;

/// Comparison failures surfaced by the operator evaluator. These never escape
/// the rule pass: they collapse to `passed = false` at the rule-result
/// boundary, where the message is kept as a diagnostic annotation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    #[error("value `{0}` is not numeric")]
    NonNumeric(String),
    #[error("{0} expects a list operand")]
    NotAList(&'static str),
    #[error("BETWEEN expects an ordered [low, high] range")]
    MalformedRange,
}

/// Apply one comparison operator. A `None` actual never reaches this function;
/// the rule pass fails closed before dispatching.
pub(crate) fn apply_operator(
    actual: &ContextValue,
    expected: &ExpectedValue,
    operator: RuleOperator,
    config: &EngineConfig,
) -> Result<bool, ComparisonError> {
    match operator {
        RuleOperator::Eq => Ok(scalar_eq(actual, expected)),
        RuleOperator::Ne => Ok(!scalar_eq(actual, expected)),
        RuleOperator::Gt => ordered(actual, expected).map(|(a, e)| a > e),
        RuleOperator::Gte => ordered(actual, expected).map(|(a, e)| a >= e),
        RuleOperator::Lt => ordered(actual, expected).map(|(a, e)| a < e),
        RuleOperator::Lte => ordered(actual, expected).map(|(a, e)| a <= e),
        RuleOperator::In => match expected {
            ExpectedValue::List(items) => Ok(items.contains(actual)),
            _ => Err(ComparisonError::NotAList("IN")),
        },
        RuleOperator::NotIn => match expected {
            ExpectedValue::List(items) => Ok(!items.contains(actual)),
            // Vacuous pass against an unparsable set; see EngineConfig.
            _ if config.vacuous_not_in => Ok(true),
            _ => Err(ComparisonError::NotAList("NOT_IN")),
        },
        RuleOperator::Contains => Ok(actual
            .render()
            .to_lowercase()
            .contains(&expected.render().to_lowercase())),
        RuleOperator::Between => {
            let (low, high) = range_bounds(expected)?;
            let value = numeric(actual)?;
            Ok(low <= value && value <= high)
        }
    }
}

/// Graduated 0-100 score for ordered operators, reflecting how close a numeric
/// value sits to the threshold. Any non-ordered operator or unparsable operand
/// falls back to 100/0 from the boolean outcome.
pub(crate) fn graduated_score(
    actual: &ContextValue,
    expected: &ExpectedValue,
    operator: RuleOperator,
    passed: bool,
) -> f64 {
    let fallback = if passed { 100.0 } else { 0.0 };
    if !operator.is_ordered() {
        return fallback;
    }

    let (actual_value, expected_value) = match (actual.as_number(), expected.as_scalar_number()) {
        (Some(a), Some(e)) => (a, e),
        _ => return fallback,
    };

    match operator {
        RuleOperator::Lt | RuleOperator::Lte => {
            // Lower is better: full score at or below the threshold, linear
            // decay to zero at twice the threshold.
            if actual_value <= expected_value {
                100.0
            } else if expected_value == 0.0 {
                0.0
            } else {
                let ratio = (actual_value / expected_value).min(2.0);
                (100.0 * (2.0 - ratio)).max(0.0)
            }
        }
        RuleOperator::Gt | RuleOperator::Gte => {
            // Higher is better: zero at or below half the threshold, linear
            // rise to full score at the threshold.
            if actual_value >= expected_value {
                100.0
            } else if expected_value == 0.0 {
                0.0
            } else {
                let floor = expected_value * 0.5;
                if actual_value <= floor {
                    0.0
                } else {
                    (actual_value - floor) / (expected_value - floor) * 100.0
                }
            }
        }
        _ => fallback,
    }
}

fn scalar_eq(actual: &ContextValue, expected: &ExpectedValue) -> bool {
    match expected {
        ExpectedValue::Scalar(value) => actual == value,
        // A scalar never equals a list or range operand.
        ExpectedValue::List(_) | ExpectedValue::Range { .. } => false,
    }
}

fn numeric(value: &ContextValue) -> Result<f64, ComparisonError> {
    value
        .as_number()
        .ok_or_else(|| ComparisonError::NonNumeric(value.render()))
}

fn ordered(
    actual: &ContextValue,
    expected: &ExpectedValue,
) -> Result<(f64, f64), ComparisonError> {
    let actual_value = numeric(actual)?;
    let expected_value = match expected {
        ExpectedValue::Scalar(value) => numeric(value)?,
        other => return Err(ComparisonError::NonNumeric(other.render())),
    };
    Ok((actual_value, expected_value))
}

fn range_bounds(expected: &ExpectedValue) -> Result<(f64, f64), ComparisonError> {
    match expected {
        ExpectedValue::Range { low, high } => Ok((*low, *high)),
        ExpectedValue::List(items) if items.len() == 2 => {
            let low = items[0]
                .as_number()
                .ok_or(ComparisonError::MalformedRange)?;
            let high = items[1]
                .as_number()
                .ok_or(ComparisonError::MalformedRange)?;
            Ok((low, high))
        }
        _ => Err(ComparisonError::MalformedRange),
    }
}
