use crate::context::{EvaluationContext, SignalValue};
use crate::model::config::{
    CustomSignalCondition, NamedCondition, OneOfCondition, PercentCondition,
};
use crate::model::enums::{CustomSignalOperator, PercentOperator};
use crate::utils::{compare_versions, percentile_bucket};
use log::{debug, warn};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;

const MAX_CONDITION_RECURSION_DEPTH: usize = 10;

/// Evaluates every named condition against the context.
///
/// Pure and infallible: malformed or unsupported sub-expressions evaluate to
/// `false` and are logged, never surfaced.
pub(crate) fn evaluate_conditions(
    conditions: &[NamedCondition],
    context: &EvaluationContext,
) -> HashMap<String, bool> {
    conditions
        .iter()
        .map(|named| {
            (
                named.name.clone(),
                evaluate_condition(&named.condition, context, 0),
            )
        })
        .collect()
}

fn evaluate_condition(
    condition: &OneOfCondition,
    context: &EvaluationContext,
    nesting_level: usize,
) -> bool {
    if nesting_level >= MAX_CONDITION_RECURSION_DEPTH {
        warn!(event_id = 200; "Maximum condition recursion depth {MAX_CONDITION_RECURSION_DEPTH} exceeded. Evaluating the sub-expression to false.");
        return false;
    }
    match condition {
        OneOfCondition::Or(or) => or
            .conditions
            .iter()
            .any(|child| evaluate_condition(child, context, nesting_level + 1)),
        OneOfCondition::And(and) => and
            .conditions
            .iter()
            .all(|child| evaluate_condition(child, context, nesting_level + 1)),
        OneOfCondition::Percent(percent) => evaluate_percent(percent, context),
        OneOfCondition::CustomSignal(signal) => evaluate_custom_signal(signal, context),
        OneOfCondition::Boolean(value) => *value,
        OneOfCondition::Unknown => {
            debug!("Unknown condition type. Evaluating to false.");
            false
        }
    }
}

fn evaluate_percent(condition: &PercentCondition, context: &EvaluationContext) -> bool {
    let Some(randomization_id) = context.randomization_id_str() else {
        warn!(event_id = 201; "Missing or non-string randomizationId in the evaluation context. Percent condition evaluates to false.");
        return false;
    };
    let bucket = percentile_bucket(condition.seed.as_str(), randomization_id);
    match condition.percent_operator {
        PercentOperator::LessOrEqual => bucket <= u64::from(condition.micro_percent.unwrap_or(0)),
        PercentOperator::GreaterThan => bucket > u64::from(condition.micro_percent.unwrap_or(0)),
        PercentOperator::Between => {
            let range = condition.micro_percent_range.unwrap_or_default();
            u64::from(range.micro_percent_lower_bound) < bucket
                && bucket <= u64::from(range.micro_percent_upper_bound)
        }
        PercentOperator::Unknown => {
            warn!(event_id = 202; "Unknown percent operator. Percent condition evaluates to false.");
            false
        }
    }
}

fn evaluate_custom_signal(condition: &CustomSignalCondition, context: &EvaluationContext) -> bool {
    let operator = condition.custom_signal_operator;
    if operator == CustomSignalOperator::Unknown
        || condition.custom_signal_key.is_empty()
        || condition.target_custom_signal_values.is_empty()
    {
        warn!(event_id = 203; "Missing operator, key, or target values for custom signal condition. Evaluating to false.");
        return false;
    }
    let Some(actual) = context.get(condition.custom_signal_key.as_str()) else {
        return false;
    };
    let targets = condition.target_custom_signal_values.as_slice();

    if operator.is_numeric() {
        return compare_numbers(actual, targets, ordering_predicate(operator));
    }
    if operator.is_semantic_version() {
        return compare_semantic_versions(actual, targets, ordering_predicate(operator));
    }

    let Some(actual_str) = actual.as_comparison_str() else {
        debug!("Custom signal '{}' has a type invalid for string comparison. Evaluating to false.", condition.custom_signal_key);
        return false;
    };
    let actual_str = actual_str.trim_ascii();
    match operator {
        CustomSignalOperator::StringContains => targets
            .iter()
            .any(|target| actual_str.contains(target.trim_ascii())),
        CustomSignalOperator::StringDoesNotContain => !targets
            .iter()
            .any(|target| actual_str.contains(target.trim_ascii())),
        CustomSignalOperator::StringExactlyMatches => targets
            .iter()
            .any(|target| target.trim_ascii() == actual_str),
        CustomSignalOperator::StringContainsRegex => targets
            .iter()
            .any(|target| match Regex::new(target.trim_ascii()) {
                Ok(pattern) => pattern.is_match(actual_str),
                Err(err) => {
                    debug!("Invalid regex target in custom signal condition: {err}");
                    false
                }
            }),
        _ => false,
    }
}

fn ordering_predicate(operator: CustomSignalOperator) -> fn(Ordering) -> bool {
    match operator {
        CustomSignalOperator::NumericLessThan
        | CustomSignalOperator::SemanticVersionLessThan => |ord| ord == Ordering::Less,
        CustomSignalOperator::NumericLessEqual
        | CustomSignalOperator::SemanticVersionLessEqual => |ord| ord != Ordering::Greater,
        CustomSignalOperator::NumericEqual | CustomSignalOperator::SemanticVersionEqual => {
            |ord| ord == Ordering::Equal
        }
        CustomSignalOperator::NumericNotEqual
        | CustomSignalOperator::SemanticVersionNotEqual => |ord| ord != Ordering::Equal,
        CustomSignalOperator::NumericGreaterThan
        | CustomSignalOperator::SemanticVersionGreaterThan => |ord| ord == Ordering::Greater,
        CustomSignalOperator::NumericGreaterEqual
        | CustomSignalOperator::SemanticVersionGreaterEqual => |ord| ord != Ordering::Less,
        _ => |_| false,
    }
}

fn compare_numbers(
    actual: &SignalValue,
    targets: &[String],
    predicate: fn(Ordering) -> bool,
) -> bool {
    if targets.len() != 1 {
        warn!(event_id = 204; "Numeric operators require exactly one target value, got {}. Evaluating to false.", targets.len());
        return false;
    }
    let Some(actual) = actual.as_float() else {
        return false;
    };
    let Ok(target) = targets[0].trim_ascii().parse::<f64>() else {
        return false;
    };
    match actual.partial_cmp(&target) {
        Some(ordering) => predicate(ordering),
        None => false,
    }
}

fn compare_semantic_versions(
    actual: &SignalValue,
    targets: &[String],
    predicate: fn(Ordering) -> bool,
) -> bool {
    if targets.len() != 1 {
        warn!(event_id = 204; "Semantic version operators require exactly one target value, got {}. Evaluating to false.", targets.len());
        return false;
    }
    let Some(actual) = actual.as_comparison_str() else {
        return false;
    };
    match compare_versions(actual.as_str(), targets[0].as_str()) {
        Some(ordering) => predicate(ordering),
        None => false,
    }
}

#[cfg(test)]
mod eval_tests {
    use super::*;
    use crate::model::config::{AndCondition, MicroPercentRange, OrCondition};

    fn percent(
        operator: PercentOperator,
        seed: &str,
        micro_percent: Option<u32>,
        range: Option<(u32, u32)>,
    ) -> OneOfCondition {
        OneOfCondition::Percent(PercentCondition {
            percent_operator: operator,
            seed: seed.to_owned(),
            micro_percent,
            micro_percent_range: range.map(|(lower, upper)| MicroPercentRange {
                micro_percent_lower_bound: lower,
                micro_percent_upper_bound: upper,
            }),
        })
    }

    fn signal(
        operator: CustomSignalOperator,
        key: &str,
        targets: &[&str],
    ) -> OneOfCondition {
        OneOfCondition::CustomSignal(CustomSignalCondition {
            custom_signal_operator: operator,
            custom_signal_key: key.to_owned(),
            target_custom_signal_values: targets.iter().map(|t| (*t).to_owned()).collect(),
        })
    }

    fn eval(condition: &OneOfCondition, context: &EvaluationContext) -> bool {
        evaluate_condition(condition, context, 0)
    }

    fn nested_or(depth: usize, leaf: OneOfCondition) -> OneOfCondition {
        let mut condition = leaf;
        for _ in 0..depth {
            condition = OneOfCondition::Or(OrCondition {
                conditions: vec![condition],
            });
        }
        condition
    }

    #[test]
    fn boolean_and_unknown_leaves() {
        let context = EvaluationContext::new();
        assert!(eval(&OneOfCondition::Boolean(true), &context));
        assert!(!eval(&OneOfCondition::Boolean(false), &context));
        assert!(!eval(&OneOfCondition::Unknown, &context));
    }

    #[test]
    fn empty_or_is_false_empty_and_is_true() {
        let context = EvaluationContext::new();
        assert!(!eval(
            &OneOfCondition::Or(OrCondition { conditions: vec![] }),
            &context
        ));
        assert!(eval(
            &OneOfCondition::And(AndCondition { conditions: vec![] }),
            &context
        ));
    }

    #[test]
    fn or_and_combinators() {
        let context = EvaluationContext::new();
        let or = OneOfCondition::Or(OrCondition {
            conditions: vec![OneOfCondition::Boolean(false), OneOfCondition::Boolean(true)],
        });
        assert!(eval(&or, &context));

        let and = OneOfCondition::And(AndCondition {
            conditions: vec![OneOfCondition::Boolean(true), OneOfCondition::Boolean(false)],
        });
        assert!(!eval(&and, &context));

        // An unknown child poisons AND but not OR.
        let and_unknown = OneOfCondition::And(AndCondition {
            conditions: vec![OneOfCondition::Boolean(true), OneOfCondition::Unknown],
        });
        assert!(!eval(&and_unknown, &context));
        let or_unknown = OneOfCondition::Or(OrCondition {
            conditions: vec![OneOfCondition::Unknown, OneOfCondition::Boolean(true)],
        });
        assert!(eval(&or_unknown, &context));
    }

    #[test]
    fn recursion_depth_guard() {
        let context = EvaluationContext::new();
        // Nine nested ORs keep the true leaf just under the cap.
        assert!(eval(&nested_or(9, OneOfCondition::Boolean(true)), &context));
        // Ten or more hit the cap before the leaf is reached.
        assert!(!eval(&nested_or(10, OneOfCondition::Boolean(true)), &context));
        assert!(!eval(&nested_or(12, OneOfCondition::Boolean(true)), &context));
    }

    #[test]
    fn percent_requires_string_randomization_id() {
        let condition = percent(PercentOperator::Between, "", None, Some((0, 100_000_000)));
        assert!(!eval(&condition, &EvaluationContext::new()));
        assert!(!eval(
            &condition,
            &EvaluationContext::new().signal(crate::context::RANDOMIZATION_ID, 42)
        ));
        assert!(eval(
            &condition,
            &EvaluationContext::new().randomization_id("anything")
        ));
    }

    #[test]
    fn percent_less_or_equal_boundary() {
        // percentile_bucket("s", "r") == 25_745_838.
        let context = EvaluationContext::new().randomization_id("r");
        assert!(eval(
            &percent(PercentOperator::LessOrEqual, "s", Some(25_745_838), None),
            &context
        ));
        assert!(!eval(
            &percent(PercentOperator::LessOrEqual, "s", Some(25_745_837), None),
            &context
        ));
    }

    #[test]
    fn percent_greater_than_boundary() {
        let context = EvaluationContext::new().randomization_id("r");
        assert!(!eval(
            &percent(PercentOperator::GreaterThan, "s", Some(25_745_838), None),
            &context
        ));
        assert!(eval(
            &percent(PercentOperator::GreaterThan, "s", Some(25_745_837), None),
            &context
        ));
    }

    #[test]
    fn percent_operators_partition_the_id_space() {
        for id in ["alice", "bob", "carol", "dave", "erin"] {
            let context = EvaluationContext::new().randomization_id(id);
            for micro_percent in [0, 25_000_000, 50_000_000, 100_000_000] {
                let le = eval(
                    &percent(PercentOperator::LessOrEqual, "dual", Some(micro_percent), None),
                    &context,
                );
                let gt = eval(
                    &percent(PercentOperator::GreaterThan, "dual", Some(micro_percent), None),
                    &context,
                );
                assert_ne!(le, gt, "LESS_OR_EQUAL and GREATER_THAN must partition, id={id}");
            }
        }
    }

    #[test]
    fn percent_between_is_left_exclusive_right_inclusive() {
        // percentile_bucket("s", "r") == 25_745_838.
        let bucket = 25_745_838u32;
        let context = EvaluationContext::new().randomization_id("r");
        assert!(eval(
            &percent(PercentOperator::Between, "s", None, Some((bucket - 1, bucket))),
            &context
        ));
        assert!(!eval(
            &percent(PercentOperator::Between, "s", None, Some((bucket, bucket + 1))),
            &context
        ));
    }

    #[test]
    fn percent_empty_seed_hashes_bare_id() {
        // percentile_bucket("", "r") == 23_368_609.
        let context = EvaluationContext::new().randomization_id("r");
        assert!(eval(
            &percent(PercentOperator::LessOrEqual, "", Some(23_368_609), None),
            &context
        ));
        assert!(!eval(
            &percent(PercentOperator::LessOrEqual, "", Some(23_368_608), None),
            &context
        ));
    }

    #[test]
    fn percent_defaults_and_unknown_operator() {
        let context = EvaluationContext::new().randomization_id("r");
        // Missing micro-percent targets default to zero.
        assert!(eval(&percent(PercentOperator::GreaterThan, "s", None, None), &context));
        assert!(!eval(&percent(PercentOperator::Between, "s", None, None), &context));
        assert!(!eval(&percent(PercentOperator::Unknown, "s", Some(100_000_000), None), &context));
    }

    #[test]
    fn string_contains_family() {
        let context = EvaluationContext::new().signal("plan", "  premium-annual ");
        assert!(eval(
            &signal(CustomSignalOperator::StringContains, "plan", &["premium", "gold"]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::StringContains, "plan", &["gold"]),
            &context
        ));
        assert!(eval(
            &signal(CustomSignalOperator::StringDoesNotContain, "plan", &["gold", "silver"]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::StringDoesNotContain, "plan", &["gold", "annual"]),
            &context
        ));
        // Both sides are trimmed before comparison.
        assert!(eval(
            &signal(CustomSignalOperator::StringExactlyMatches, "plan", &[" premium-annual "]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::StringExactlyMatches, "plan", &["premium"]),
            &context
        ));
    }

    #[test]
    fn string_comparison_stringifies_numbers() {
        let context = EvaluationContext::new().signal("build", 1234).signal("ratio", 2.5);
        assert!(eval(
            &signal(CustomSignalOperator::StringExactlyMatches, "build", &["1234"]),
            &context
        ));
        assert!(eval(
            &signal(CustomSignalOperator::StringContains, "ratio", &[".5"]),
            &context
        ));
    }

    #[test]
    fn string_comparison_rejects_booleans() {
        let context = EvaluationContext::new().signal("beta", true);
        assert!(!eval(
            &signal(CustomSignalOperator::StringExactlyMatches, "beta", &["true"]),
            &context
        ));
    }

    #[test]
    fn string_contains_regex() {
        let context = EvaluationContext::new().signal("email", "dev@example.com");
        assert!(eval(
            &signal(CustomSignalOperator::StringContainsRegex, "email", &["@example\\.com$"]),
            &context
        ));
        // Unanchored search: a match anywhere in the signal counts.
        assert!(eval(
            &signal(CustomSignalOperator::StringContainsRegex, "email", &["exam"]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::StringContainsRegex, "email", &["^example"]),
            &context
        ));
        // An invalid pattern never matches.
        assert!(!eval(
            &signal(CustomSignalOperator::StringContainsRegex, "email", &["(unclosed"]),
            &context
        ));
    }

    #[test]
    fn numeric_operators() {
        let context = EvaluationContext::new().signal("count", 5);
        assert!(eval(&signal(CustomSignalOperator::NumericLessThan, "count", &["6"]), &context));
        assert!(!eval(&signal(CustomSignalOperator::NumericLessThan, "count", &["5"]), &context));
        assert!(eval(&signal(CustomSignalOperator::NumericLessEqual, "count", &["5"]), &context));
        assert!(eval(&signal(CustomSignalOperator::NumericEqual, "count", &["5.0"]), &context));
        assert!(eval(&signal(CustomSignalOperator::NumericNotEqual, "count", &["5.5"]), &context));
        assert!(eval(&signal(CustomSignalOperator::NumericGreaterThan, "count", &["4.9"]), &context));
        assert!(eval(&signal(CustomSignalOperator::NumericGreaterEqual, "count", &["5"]), &context));
        assert!(!eval(&signal(CustomSignalOperator::NumericGreaterEqual, "count", &["5.1"]), &context));
    }

    #[test]
    fn numeric_operators_coerce_strings() {
        let context = EvaluationContext::new().signal("count", " 5.25 ");
        assert!(eval(&signal(CustomSignalOperator::NumericEqual, "count", &[" 5.25"]), &context));
        let unparseable = EvaluationContext::new().signal("count", "five");
        assert!(!eval(&signal(CustomSignalOperator::NumericEqual, "count", &["5"]), &unparseable));
    }

    #[test]
    fn numeric_operators_require_exactly_one_target() {
        let context = EvaluationContext::new().signal("count", 5);
        assert!(!eval(
            &signal(CustomSignalOperator::NumericEqual, "count", &["5", "6"]),
            &context
        ));
    }

    #[test]
    fn semantic_version_operators() {
        let context = EvaluationContext::new().signal("app_version", "1.2");
        assert!(!eval(
            &signal(CustomSignalOperator::SemanticVersionGreaterEqual, "app_version", &["1.2.3"]),
            &context
        ));
        let context = EvaluationContext::new().signal("app_version", "1.2.3");
        assert!(eval(
            &signal(CustomSignalOperator::SemanticVersionGreaterEqual, "app_version", &["1.2.3"]),
            &context
        ));
        assert!(eval(
            &signal(CustomSignalOperator::SemanticVersionEqual, "app_version", &["1.2.3.0"]),
            &context
        ));
        assert!(eval(
            &signal(CustomSignalOperator::SemanticVersionLessThan, "app_version", &["1.10"]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::SemanticVersionNotEqual, "app_version", &["1.2.3"]),
            &context
        ));
        // Invalid versions and multiple targets never match.
        assert!(!eval(
            &signal(CustomSignalOperator::SemanticVersionEqual, "app_version", &["1.2.x"]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::SemanticVersionEqual, "app_version", &["1.2.3", "1.2.4"]),
            &context
        ));
    }

    #[test]
    fn custom_signal_missing_pieces() {
        let context = EvaluationContext::new().signal("tier", "paid");
        // Missing context key.
        assert!(!eval(
            &signal(CustomSignalOperator::StringExactlyMatches, "other", &["paid"]),
            &context
        ));
        // Empty key, empty targets, unknown operator.
        assert!(!eval(
            &signal(CustomSignalOperator::StringExactlyMatches, "", &["paid"]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::StringExactlyMatches, "tier", &[]),
            &context
        ));
        assert!(!eval(
            &signal(CustomSignalOperator::Unknown, "tier", &["paid"]),
            &context
        ));
    }

    #[test]
    fn named_condition_results() {
        let conditions = vec![
            NamedCondition {
                name: "always".to_owned(),
                condition: percent(PercentOperator::Between, "", None, Some((0, 100_000_000))),
            },
            NamedCondition {
                name: "never".to_owned(),
                condition: OneOfCondition::Unknown,
            },
        ];
        let context = EvaluationContext::new().randomization_id("anything");
        let results = evaluate_conditions(conditions.as_slice(), &context);
        assert!(results["always"]);
        assert!(!results["never"]);
    }

    #[test]
    fn bucketing_uniformity() {
        use rand::distr::{Alphanumeric, SampleString};

        // With 10_000 random ids, the 25% slice should hold 2_500 ± 5σ.
        let micro_percent = 25_000_000u32;
        let condition = percent(PercentOperator::LessOrEqual, "uniform", Some(micro_percent), None);
        let mut hits = 0;
        let samples = 10_000;
        for _ in 0..samples {
            let id = Alphanumeric.sample_string(&mut rand::rng(), 16);
            let context = EvaluationContext::new().randomization_id(id.as_str());
            if eval(&condition, &context) {
                hits += 1;
            }
        }
        // sqrt(n * p * (1 - p)) is about 43.3; the window is five sigmas.
        assert!((2_284..=2_716).contains(&hits), "hits={hits}");
    }
}
