use super::common::{number, text};
use crate::eligibility::domain::{ContextValue, ExpectedValue, RuleOperator};
use crate::eligibility::evaluation::operators::{apply_operator, graduated_score};
use crate::eligibility::evaluation::{ComparisonError, EngineConfig};

fn config() -> EngineConfig {
    EngineConfig::default()
}

#[test]
fn eq_is_structural_without_coercion() {
    let actual = ContextValue::Number(18.0);
    assert_eq!(
        apply_operator(&actual, &number(18.0), RuleOperator::Eq, &config()),
        Ok(true)
    );
    // A textual "18" is not the number 18.
    assert_eq!(
        apply_operator(&actual, &text("18"), RuleOperator::Eq, &config()),
        Ok(false)
    );
}

#[test]
fn ne_against_non_scalar_operand_holds() {
    let actual = ContextValue::Text("FEMALE".to_string());
    let expected = ExpectedValue::List(vec![ContextValue::from("FEMALE")]);
    assert_eq!(
        apply_operator(&actual, &expected, RuleOperator::Ne, &config()),
        Ok(true)
    );
}

#[test]
fn ordered_comparisons_parse_text_operands() {
    let actual = ContextValue::Text("42".to_string());
    assert_eq!(
        apply_operator(&actual, &number(40.0), RuleOperator::Gt, &config()),
        Ok(true)
    );
    assert_eq!(
        apply_operator(&actual, &number(42.0), RuleOperator::Gte, &config()),
        Ok(true)
    );
    assert_eq!(
        apply_operator(&actual, &number(42.0), RuleOperator::Lt, &config()),
        Ok(false)
    );
}

#[test]
fn ordered_comparison_rejects_non_numeric_operand() {
    let actual = ContextValue::Text("UNEMPLOYED".to_string());
    assert_eq!(
        apply_operator(&actual, &number(5.0), RuleOperator::Gt, &config()),
        Err(ComparisonError::NonNumeric("UNEMPLOYED".to_string()))
    );
}

#[test]
fn in_requires_a_list_operand() {
    let actual = ContextValue::Text("NYANGA".to_string());
    let divisions = ExpectedValue::List(vec![
        ContextValue::from("NYANGA"),
        ContextValue::from("OGOOUE-LOLO"),
    ]);
    assert_eq!(
        apply_operator(&actual, &divisions, RuleOperator::In, &config()),
        Ok(true)
    );
    assert_eq!(
        apply_operator(&actual, &text("NYANGA"), RuleOperator::In, &config()),
        Err(ComparisonError::NotAList("IN"))
    );
}

#[test]
fn not_in_passes_vacuously_on_malformed_operand_by_default() {
    let actual = ContextValue::Text("ESTUAIRE".to_string());
    assert_eq!(
        apply_operator(&actual, &text("ESTUAIRE"), RuleOperator::NotIn, &config()),
        Ok(true)
    );
}

#[test]
fn not_in_fails_closed_when_vacuous_pass_is_disabled() {
    let strict = EngineConfig {
        vacuous_not_in: false,
        ..EngineConfig::default()
    };
    let actual = ContextValue::Text("ESTUAIRE".to_string());
    assert_eq!(
        apply_operator(&actual, &text("ESTUAIRE"), RuleOperator::NotIn, &strict),
        Err(ComparisonError::NotAList("NOT_IN"))
    );
}

#[test]
fn not_in_rejects_listed_members() {
    let actual = ContextValue::Text("NYANGA".to_string());
    let divisions = ExpectedValue::List(vec![ContextValue::from("NYANGA")]);
    assert_eq!(
        apply_operator(&actual, &divisions, RuleOperator::NotIn, &config()),
        Ok(false)
    );
}

#[test]
fn contains_is_case_insensitive() {
    let actual = ContextValue::Text("Ogooue-Maritime".to_string());
    assert_eq!(
        apply_operator(&actual, &text("MARITIME"), RuleOperator::Contains, &config()),
        Ok(true)
    );
    assert_eq!(
        apply_operator(&actual, &text("woleu"), RuleOperator::Contains, &config()),
        Ok(false)
    );
}

#[test]
fn between_is_inclusive_at_both_bounds() {
    let expected = ExpectedValue::Range { low: 18.0, high: 65.0 };
    for (value, inside) in [(17.9, false), (18.0, true), (40.0, true), (65.0, true), (65.1, false)]
    {
        assert_eq!(
            apply_operator(
                &ContextValue::Number(value),
                &expected,
                RuleOperator::Between,
                &config()
            ),
            Ok(inside),
            "value {value}"
        );
    }
}

#[test]
fn between_accepts_a_two_element_numeric_list() {
    let expected = ExpectedValue::List(vec![ContextValue::Number(10.0), ContextValue::Number(20.0)]);
    assert_eq!(
        apply_operator(
            &ContextValue::Number(15.0),
            &expected,
            RuleOperator::Between,
            &config()
        ),
        Ok(true)
    );
}

#[test]
fn between_rejects_malformed_ranges() {
    let three_elements = ExpectedValue::List(vec![
        ContextValue::Number(1.0),
        ContextValue::Number(2.0),
        ContextValue::Number(3.0),
    ]);
    assert_eq!(
        apply_operator(
            &ContextValue::Number(2.0),
            &three_elements,
            RuleOperator::Between,
            &config()
        ),
        Err(ComparisonError::MalformedRange)
    );

    let textual_bound =
        ExpectedValue::List(vec![ContextValue::from("low"), ContextValue::Number(2.0)]);
    assert_eq!(
        apply_operator(
            &ContextValue::Number(1.0),
            &textual_bound,
            RuleOperator::Between,
            &config()
        ),
        Err(ComparisonError::MalformedRange)
    );
}

#[test]
fn graduated_lower_is_better_decays_linearly() {
    let expected = number(1000.0);

    let at_threshold =
        graduated_score(&ContextValue::Number(1000.0), &expected, RuleOperator::Lte, true);
    assert_eq!(at_threshold, 100.0);

    let at_double =
        graduated_score(&ContextValue::Number(2000.0), &expected, RuleOperator::Lte, false);
    assert_eq!(at_double, 0.0);

    let mid = graduated_score(&ContextValue::Number(1500.0), &expected, RuleOperator::Lte, false);
    assert!((mid - 50.0).abs() < 1e-9);

    // Strictly decreasing across the decay window.
    let earlier =
        graduated_score(&ContextValue::Number(1200.0), &expected, RuleOperator::Lte, false);
    let later =
        graduated_score(&ContextValue::Number(1800.0), &expected, RuleOperator::Lte, false);
    assert!(earlier > mid && mid > later);

    let beyond =
        graduated_score(&ContextValue::Number(5000.0), &expected, RuleOperator::Lte, false);
    assert_eq!(beyond, 0.0);
}

#[test]
fn graduated_higher_is_better_rises_from_the_midpoint() {
    let expected = number(1000.0);

    assert_eq!(
        graduated_score(&ContextValue::Number(500.0), &expected, RuleOperator::Gte, false),
        0.0
    );
    assert_eq!(
        graduated_score(&ContextValue::Number(100.0), &expected, RuleOperator::Gte, false),
        0.0
    );
    assert_eq!(
        graduated_score(&ContextValue::Number(1000.0), &expected, RuleOperator::Gte, true),
        100.0
    );

    let mid = graduated_score(&ContextValue::Number(750.0), &expected, RuleOperator::Gte, false);
    assert!((mid - 50.0).abs() < 1e-9);
}

#[test]
fn graduated_guards_a_zero_expected_value() {
    let expected = number(0.0);
    assert_eq!(
        graduated_score(&ContextValue::Number(5.0), &expected, RuleOperator::Lte, false),
        0.0
    );
    assert_eq!(
        graduated_score(&ContextValue::Number(-3.0), &expected, RuleOperator::Gte, false),
        0.0
    );
    // At the threshold the full score still applies.
    assert_eq!(
        graduated_score(&ContextValue::Number(0.0), &expected, RuleOperator::Lte, true),
        100.0
    );
}

#[test]
fn graduated_falls_back_to_boolean_outcome() {
    // Non-ordered operator.
    assert_eq!(
        graduated_score(
            &ContextValue::from("FEMALE"),
            &text("FEMALE"),
            RuleOperator::Eq,
            true
        ),
        100.0
    );
    // Unparsable operand on an ordered operator.
    assert_eq!(
        graduated_score(
            &ContextValue::from("POOR"),
            &number(10.0),
            RuleOperator::Lte,
            false
        ),
        0.0
    );
}
