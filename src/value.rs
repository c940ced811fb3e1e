use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Provenance of a config value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// The parameter is unknown, or the template explicitly deferred to an
    /// in-app default that was not supplied either.
    Static,
    /// The value came from the in-app defaults given at template creation.
    Default,
    /// The value came from the remote template.
    Remote,
}

const BOOL_TRUTHY: [&str; 6] = ["1", "true", "t", "yes", "y", "on"];

/// A single config value: its provenance and its stringified form.
///
/// The typed accessors never fail; coercion falls back to the type's zero
/// value, and a [`ValueSource::Static`] value always reads as the zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    source: ValueSource,
    raw: String,
}

impl Value {
    pub(crate) fn new(source: ValueSource, raw: String) -> Self {
        Self { source, raw }
    }

    pub(crate) fn synthetic() -> Self {
        Self {
            source: ValueSource::Static,
            raw: String::default(),
        }
    }

    /// Where the value came from.
    pub fn source(&self) -> ValueSource {
        self.source
    }

    /// The stringified value as stored.
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// `true` iff the value is non-static and its trimmed, lower-cased form
    /// is one of `1`, `true`, `t`, `yes`, `y`, `on`.
    pub fn as_bool(&self) -> bool {
        if self.source == ValueSource::Static {
            return false;
        }
        BOOL_TRUTHY.contains(&self.raw.trim_ascii().to_ascii_lowercase().as_str())
    }

    /// The value parsed as a base-10 integer; 0 when static or unparseable.
    pub fn as_int(&self) -> i64 {
        if self.source == ValueSource::Static {
            return 0;
        }
        self.raw.trim_ascii().parse().unwrap_or(0)
    }

    /// The value parsed as a double; 0.0 when static or unparseable.
    pub fn as_float(&self) -> f64 {
        if self.source == ValueSource::Static {
            return 0.0;
        }
        self.raw.trim_ascii().parse().unwrap_or(0.0)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw.as_str())
    }
}

/// The result of evaluating a server template: an immutable map of parameter
/// names to provenance-tagged values.
///
/// # Examples
///
/// ```no_run
/// use firebase_remote_config::{Client, EvaluationContext, ValueSource};
///
/// #[tokio::main]
/// async fn main() {
///     let client = Client::new("my-project").unwrap();
///     let template = client.get_server_template(Default::default()).await.unwrap();
///
///     let config = template
///         .evaluate(&EvaluationContext::new().randomization_id("user-1234"))
///         .unwrap();
///     let message = config.get_string("welcome_message");
///     let enabled = config.get_bool("feature_x");
///     assert_eq!(config.get_value_source("welcome_message"), ValueSource::Remote);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    values: HashMap<String, Value>,
}

impl ServerConfig {
    pub(crate) fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// The stored value for `key`, or a synthetic `(Static, "")` value when
    /// the parameter is unknown.
    pub fn get_value(&self, key: &str) -> Value {
        self.values.get(key).cloned().unwrap_or_else(Value::synthetic)
    }

    /// The stored string as-is; empty when the parameter is unknown.
    pub fn get_string(&self, key: &str) -> String {
        self.get_value(key).as_str().to_owned()
    }

    /// See [`Value::as_bool`].
    pub fn get_bool(&self, key: &str) -> bool {
        self.get_value(key).as_bool()
    }

    /// See [`Value::as_int`].
    pub fn get_int(&self, key: &str) -> i64 {
        self.get_value(key).as_int()
    }

    /// See [`Value::as_float`]. This is the accessor for any numeric
    /// parameter; integers parse as doubles too.
    pub fn get_float(&self, key: &str) -> f64 {
        self.get_value(key).as_float()
    }

    /// Provenance of the stored value; [`ValueSource::Static`] when the
    /// parameter is unknown.
    pub fn get_value_source(&self, key: &str) -> ValueSource {
        self.get_value(key).source()
    }

    /// The names of all parameters that resolved to a value.
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
