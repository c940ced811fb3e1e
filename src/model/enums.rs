use serde::{Deserialize, Serialize};

/// Operator applied to the hashed percentile bucket of a percent condition.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PercentOperator {
    /// Matches when the bucket is less than or equal to the target micro-percent.
    LessOrEqual,
    /// Matches when the bucket is greater than the target micro-percent.
    GreaterThan,
    /// Matches when the bucket falls in the (lower, upper] micro-percent range.
    Between,
    /// Catch-all for operators this SDK version does not know; never matches.
    #[default]
    #[serde(other)]
    #[serde(rename = "PERCENT_OPERATOR_UNSPECIFIED")]
    Unknown,
}

/// Operator which defines the relation between a custom signal in the
/// evaluation context and the condition's target values.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomSignalOperator {
    /// Matches when the signal contains any target value as a substring.
    StringContains,
    /// Matches when the signal contains none of the target values.
    StringDoesNotContain,
    /// Matches when the signal equals any target value exactly.
    StringExactlyMatches,
    /// Matches when any target value, compiled as a regular expression,
    /// matches the signal anywhere.
    StringContainsRegex,
    /// Matches when the signal, as a number, is less than the target.
    NumericLessThan,
    /// Matches when the signal, as a number, is less than or equal to the target.
    NumericLessEqual,
    /// Matches when the signal, as a number, equals the target.
    NumericEqual,
    /// Matches when the signal, as a number, differs from the target.
    NumericNotEqual,
    /// Matches when the signal, as a number, is greater than the target.
    NumericGreaterThan,
    /// Matches when the signal, as a number, is greater than or equal to the target.
    NumericGreaterEqual,
    /// Matches when the signal, as a version, is older than the target.
    SemanticVersionLessThan,
    /// Matches when the signal, as a version, is older than or equal to the target.
    SemanticVersionLessEqual,
    /// Matches when the signal, as a version, equals the target.
    SemanticVersionEqual,
    /// Matches when the signal, as a version, differs from the target.
    SemanticVersionNotEqual,
    /// Matches when the signal, as a version, is newer than the target.
    SemanticVersionGreaterThan,
    /// Matches when the signal, as a version, is newer than or equal to the target.
    SemanticVersionGreaterEqual,
    /// Catch-all for operators this SDK version does not know; never matches.
    #[default]
    #[serde(other)]
    #[serde(rename = "CUSTOM_SIGNAL_OPERATOR_UNSPECIFIED")]
    Unknown,
}

impl CustomSignalOperator {
    pub(crate) fn is_numeric(&self) -> bool {
        matches!(
            self,
            CustomSignalOperator::NumericLessThan
                | CustomSignalOperator::NumericLessEqual
                | CustomSignalOperator::NumericEqual
                | CustomSignalOperator::NumericNotEqual
                | CustomSignalOperator::NumericGreaterThan
                | CustomSignalOperator::NumericGreaterEqual
        )
    }

    pub(crate) fn is_semantic_version(&self) -> bool {
        matches!(
            self,
            CustomSignalOperator::SemanticVersionLessThan
                | CustomSignalOperator::SemanticVersionLessEqual
                | CustomSignalOperator::SemanticVersionEqual
                | CustomSignalOperator::SemanticVersionNotEqual
                | CustomSignalOperator::SemanticVersionGreaterThan
                | CustomSignalOperator::SemanticVersionGreaterEqual
        )
    }
}

#[cfg(test)]
mod enums_tests {
    use super::{CustomSignalOperator, PercentOperator};

    #[test]
    fn percent_operator_wire_names() {
        let op: PercentOperator = serde_json::from_str("\"LESS_OR_EQUAL\"").unwrap();
        assert_eq!(op, PercentOperator::LessOrEqual);
        let op: PercentOperator = serde_json::from_str("\"GREATER_THAN\"").unwrap();
        assert_eq!(op, PercentOperator::GreaterThan);
        let op: PercentOperator = serde_json::from_str("\"BETWEEN\"").unwrap();
        assert_eq!(op, PercentOperator::Between);
        assert_eq!(
            serde_json::to_string(&PercentOperator::Between).unwrap(),
            "\"BETWEEN\""
        );
    }

    #[test]
    fn unknown_operator_tolerated() {
        let op: PercentOperator = serde_json::from_str("\"SOME_FUTURE_OPERATOR\"").unwrap();
        assert_eq!(op, PercentOperator::Unknown);
        let op: CustomSignalOperator = serde_json::from_str("\"STRING_FUZZY_MATCHES\"").unwrap();
        assert_eq!(op, CustomSignalOperator::Unknown);
    }

    #[test]
    fn custom_signal_operator_wire_names() {
        let op: CustomSignalOperator =
            serde_json::from_str("\"SEMANTIC_VERSION_GREATER_EQUAL\"").unwrap();
        assert_eq!(op, CustomSignalOperator::SemanticVersionGreaterEqual);
        assert_eq!(
            serde_json::to_string(&CustomSignalOperator::StringDoesNotContain).unwrap(),
            "\"STRING_DOES_NOT_CONTAIN\""
        );
        assert!(CustomSignalOperator::NumericNotEqual.is_numeric());
        assert!(!CustomSignalOperator::StringContains.is_numeric());
        assert!(CustomSignalOperator::SemanticVersionEqual.is_semantic_version());
        assert!(!CustomSignalOperator::NumericEqual.is_semantic_version());
    }
}
