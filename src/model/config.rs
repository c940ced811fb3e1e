use crate::errors::InternalError;
use crate::model::enums::{CustomSignalOperator, PercentOperator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A full server-side Remote Config template: the ordered condition list,
/// the parameter dictionary, and the versioning metadata assigned by the
/// backend.
///
/// Instances are immutable once created; [`crate::ServerTemplate`] replaces
/// the whole value on every update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerTemplateData {
    /// The ordered list of named conditions. Order is priority: during
    /// parameter resolution the first condition that matches wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<NamedCondition>,
    /// The dictionary of parameters, keyed by parameter name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, Parameter>,
    /// Metadata about the published template version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// The entity tag of this template. On the fetch path this is taken from
    /// the HTTP `ETag` response header, overriding anything in the body.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etag: String,
}

pub(crate) fn template_data_from_json(json: &str) -> Result<ServerTemplateData, InternalError> {
    match serde_json::from_str::<ServerTemplateData>(json) {
        Ok(data) => Ok(data),
        Err(err) => Err(InternalError::Parse(err.to_string())),
    }
}

pub(crate) fn template_data_to_json(data: &ServerTemplateData) -> Result<String, InternalError> {
    match serde_json::to_string(data) {
        Ok(json) => Ok(json),
        Err(err) => Err(InternalError::Serialize(err.to_string())),
    }
}

/// A boolean condition together with the name parameters refer to it by.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamedCondition {
    /// Non-empty name, unique within a template.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub condition: OneOfCondition,
}

/// A condition expression. Exactly one variant is populated.
///
/// On the wire the variant is selected by the presence of its discriminating
/// field (`orCondition`, `andCondition`, `percent`, `customSignal`); when more
/// than one is present the first in that order wins. An empty or unrecognized
/// condition object decodes to [`OneOfCondition::Unknown`], which always
/// evaluates to `false`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(from = "ConditionFields", into = "ConditionFields")]
pub enum OneOfCondition {
    /// True when any child condition is true; an empty list is false.
    Or(OrCondition),
    /// True when every child condition is true; an empty list is true.
    And(AndCondition),
    /// Deterministic percentile bucketing of the context's randomization id.
    Percent(PercentCondition),
    /// Comparison against a custom signal in the evaluation context.
    CustomSignal(CustomSignalCondition),
    /// Constant result. In-memory only; it has no wire representation and
    /// serializes like [`OneOfCondition::Unknown`].
    Boolean(bool),
    /// A condition this SDK version does not understand.
    #[default]
    Unknown,
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct ConditionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    or_condition: Option<OrCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    and_condition: Option<AndCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percent: Option<PercentCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_signal: Option<CustomSignalCondition>,
}

impl From<ConditionFields> for OneOfCondition {
    fn from(fields: ConditionFields) -> Self {
        if let Some(or) = fields.or_condition {
            return OneOfCondition::Or(or);
        }
        if let Some(and) = fields.and_condition {
            return OneOfCondition::And(and);
        }
        if let Some(percent) = fields.percent {
            return OneOfCondition::Percent(percent);
        }
        if let Some(signal) = fields.custom_signal {
            return OneOfCondition::CustomSignal(signal);
        }
        OneOfCondition::Unknown
    }
}

impl From<OneOfCondition> for ConditionFields {
    fn from(condition: OneOfCondition) -> Self {
        let mut fields = ConditionFields::default();
        match condition {
            OneOfCondition::Or(or) => fields.or_condition = Some(or),
            OneOfCondition::And(and) => fields.and_condition = Some(and),
            OneOfCondition::Percent(percent) => fields.percent = Some(percent),
            OneOfCondition::CustomSignal(signal) => fields.custom_signal = Some(signal),
            OneOfCondition::Boolean(_) | OneOfCondition::Unknown => {}
        }
        fields
    }
}

/// Child conditions joined with a logical OR.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct OrCondition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<OneOfCondition>,
}

/// Child conditions joined with a logical AND.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AndCondition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<OneOfCondition>,
}

/// Targets a stable fraction of randomization ids via SHA-256 bucketing.
///
/// Micro-percent values live in `[0, 100_000_000]`; `1_000_000` equals one
/// percent, allowing sub-percent traffic allocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PercentCondition {
    #[serde(default)]
    pub percent_operator: PercentOperator,
    /// Up to 32 characters of `[-_.0-9A-Za-z]`, mixed into the hash input so
    /// distinct conditions bucket independently.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub seed: String,
    /// Target for `LESS_OR_EQUAL` / `GREATER_THAN`; absent means 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub micro_percent: Option<u32>,
    /// Target range for `BETWEEN`; absent means the empty range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub micro_percent_range: Option<MicroPercentRange>,
}

/// Left-exclusive, right-inclusive micro-percent range: `lower < bucket <= upper`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MicroPercentRange {
    #[serde(default)]
    pub micro_percent_lower_bound: u32,
    #[serde(default)]
    pub micro_percent_upper_bound: u32,
}

/// Compares a custom signal from the evaluation context against a list of
/// target values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomSignalCondition {
    #[serde(default)]
    pub custom_signal_operator: CustomSignalOperator,
    /// The evaluation-context key the signal is read from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_signal_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_custom_signal_values: Vec<String>,
}

/// The value a parameter resolves to when a condition matches, or as its
/// default. Exactly one of `value` / `useInAppDefault` appears on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "ParameterValueFields", into = "ParameterValueFields")]
pub enum ParameterValue {
    /// Serve this stringified value with `Remote` provenance.
    Value(String),
    /// Skip the remote value; the client falls through to its in-app default.
    UseInAppDefault,
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct ParameterValueFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    use_in_app_default: Option<bool>,
}

impl From<ParameterValueFields> for ParameterValue {
    fn from(fields: ParameterValueFields) -> Self {
        match fields.value {
            Some(value) => ParameterValue::Value(value),
            None => ParameterValue::UseInAppDefault,
        }
    }
}

impl From<ParameterValue> for ParameterValueFields {
    fn from(value: ParameterValue) -> Self {
        match value {
            ParameterValue::Value(value) => ParameterValueFields {
                value: Some(value),
                use_in_app_default: None,
            },
            ParameterValue::UseInAppDefault => ParameterValueFields {
                value: None,
                use_in_app_default: Some(true),
            },
        }
    }
}

/// A named config item with a default value and optional per-condition
/// overrides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Served when no conditional value applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParameterValue>,
    /// Overrides keyed by condition name. Keys that match no condition in the
    /// template are ignored during evaluation.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub conditional_values: HashMap<String, ParameterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The console's value-type annotation (`STRING`, `NUMBER`, `BOOLEAN`,
    /// `JSON`). Preserved for round-trips, never consulted by evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

/// Metadata about a published template version.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_user: Option<RemoteConfigUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_legacy: Option<bool>,
}

/// The console user that published a template version.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfigUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
