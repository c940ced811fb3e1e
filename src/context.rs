use std::collections::HashMap;

/// The reserved context key percent conditions hash on.
pub const RANDOMIZATION_ID: &str = "randomizationId";

/// Supported custom signal value types.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalValue {
    /// String signal value.
    String(String),
    /// Whole number signal value.
    Int(i64),
    /// Decimal number signal value.
    Float(f64),
    /// Boolean signal value.
    Bool(bool),
}

impl SignalValue {
    /// String-family comparisons see numbers through their canonical base-10
    /// rendering; booleans and other types are invalid for them.
    pub(crate) fn as_comparison_str(&self) -> Option<String> {
        match self {
            SignalValue::String(val) => Some(val.clone()),
            SignalValue::Int(val) => Some(val.to_string()),
            SignalValue::Float(val) => Some(val.to_string()),
            SignalValue::Bool(_) => None,
        }
    }

    pub(crate) fn as_float(&self) -> Option<f64> {
        match self {
            SignalValue::String(val) => val.trim_ascii().parse().ok(),
            SignalValue::Int(val) => Some(*val as f64),
            SignalValue::Float(val) => Some(*val),
            SignalValue::Bool(_) => None,
        }
    }
}

impl From<&str> for SignalValue {
    fn from(value: &str) -> Self {
        SignalValue::String(value.to_owned())
    }
}

impl From<String> for SignalValue {
    fn from(value: String) -> Self {
        SignalValue::String(value)
    }
}

impl From<i64> for SignalValue {
    fn from(value: i64) -> Self {
        SignalValue::Int(value)
    }
}

impl From<i32> for SignalValue {
    fn from(value: i32) -> Self {
        SignalValue::Int(value.into())
    }
}

impl From<f64> for SignalValue {
    fn from(value: f64) -> Self {
        SignalValue::Float(value)
    }
}

impl From<f32> for SignalValue {
    fn from(value: f32) -> Self {
        SignalValue::Float(value.into())
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        SignalValue::Bool(value)
    }
}

/// The caller-supplied key-value map a template is evaluated against.
///
/// The reserved `randomizationId` key feeds percent conditions; every other
/// key can be referenced by a custom signal condition.
///
/// # Examples
///
/// ```rust
/// use firebase_remote_config::EvaluationContext;
///
/// let context = EvaluationContext::new()
///     .randomization_id("user-1234")
///     .signal("tier", "paid")
///     .signal("app_version", "2.11.0")
///     .signal("session_count", 42);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    signals: HashMap<String, SignalValue>,
}

impl EvaluationContext {
    /// Initializes an empty [`EvaluationContext`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stable per-client identifier percent conditions bucket on.
    /// Without it every percent condition evaluates to `false`.
    pub fn randomization_id(mut self, id: &str) -> Self {
        self.signals
            .insert(RANDOMIZATION_ID.to_owned(), SignalValue::from(id));
        self
    }

    /// Sets a custom signal for targeting rule evaluation (e.g. subscription
    /// tier, app version, user role).
    pub fn signal<T: Into<SignalValue>>(mut self, key: &str, value: T) -> Self {
        self.signals.insert(key.to_owned(), value.into());
        self
    }

    pub(crate) fn get(&self, key: &str) -> Option<&SignalValue> {
        self.signals.get(key)
    }

    /// Percent conditions only accept a string randomization id; any other
    /// signal type in the slot is rejected.
    pub(crate) fn randomization_id_str(&self) -> Option<&str> {
        match self.signals.get(RANDOMIZATION_ID) {
            Some(SignalValue::String(id)) => Some(id.as_str()),
            _ => None,
        }
    }
}
