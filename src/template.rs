use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use log::{debug, error};

use crate::context::EvaluationContext;
use crate::errors::{ClientError, ErrorKind};
use crate::eval::evaluator::evaluate_conditions;
use crate::fetch::fetcher::{FetchResponse, Fetcher};
use crate::model::config::{
    template_data_from_json, template_data_to_json, ParameterValue, ServerTemplateData,
};
use crate::value::{ServerConfig, Value, ValueSource};

#[derive(Debug)]
struct TemplateEntry {
    data: ServerTemplateData,
    fetch_time: DateTime<Utc>,
}

/// A server template bound to one project: holds the in-app defaults fixed at
/// construction and an atomically hot-swappable cached [`ServerTemplateData`].
///
/// Safe for concurrent use: [`ServerTemplate::load`] and
/// [`ServerTemplate::set`] replace the cache pointer atomically, while
/// [`ServerTemplate::evaluate`] works on the snapshot it captured, so readers
/// observe either the old or the new template, never a torn value.
///
/// # Examples
///
/// ```no_run
/// use std::collections::HashMap;
/// use firebase_remote_config::{Client, EvaluationContext};
///
/// #[tokio::main]
/// async fn main() {
///     let client = Client::new("my-project").unwrap();
///
///     let defaults = HashMap::from([("welcome_message".to_owned(), "hi".into())]);
///     let template = client.get_server_template(defaults).await.unwrap();
///
///     let context = EvaluationContext::new().randomization_id("user-1234");
///     let config = template.evaluate(&context).unwrap();
/// }
/// ```
#[derive(Debug)]
pub struct ServerTemplate {
    default_config: HashMap<String, String>,
    cache: ArcSwapOption<TemplateEntry>,
    fetcher: Arc<Fetcher>,
}

impl ServerTemplate {
    pub(crate) fn new(
        fetcher: Arc<Fetcher>,
        defaults: HashMap<String, serde_json::Value>,
    ) -> Self {
        let default_config = defaults
            .into_iter()
            .map(|(key, value)| (key, stringify_default(&value)))
            .collect();
        Self {
            default_config,
            cache: ArcSwapOption::empty(),
            fetcher,
        }
    }

    /// Fetches the latest template from the remote endpoint and installs it
    /// in the cache.
    ///
    /// When the cache already holds a template, its etag is sent as
    /// `If-None-Match`; a `304 Not Modified` answer keeps the cached template
    /// and counts as success.
    ///
    /// # Errors
    ///
    /// Transport, remote, and codec failures propagate unchanged and leave
    /// the cache untouched.
    pub async fn load(&self) -> Result<(), ClientError> {
        let etag = match self.cache.load().as_ref() {
            Some(entry) => entry.data.etag.clone(),
            None => String::default(),
        };
        match self.fetcher.fetch(etag.as_str()).await {
            FetchResponse::Fetched(data) => {
                self.store(data);
                Ok(())
            }
            FetchResponse::NotModified => {
                debug!("Cached template is up to date.");
                Ok(())
            }
            FetchResponse::Failed(err) => Err(err),
        }
    }

    /// Parses `json` as template data and installs it in the cache, without
    /// any network round-trip.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Codec`] error and leaves the cache untouched
    /// when the document does not parse.
    pub fn set(&self, json: &str) -> Result<(), ClientError> {
        match template_data_from_json(json) {
            Ok(data) => {
                self.store(data);
                Ok(())
            }
            Err(parse_error) => {
                let err: ClientError = parse_error.into();
                error!(event_id = err.kind.event_id(); "{err}");
                Err(err)
            }
        }
    }

    /// Serializes the cached template.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Configuration`] error when no template has been
    /// loaded yet.
    pub fn to_json(&self) -> Result<String, ClientError> {
        match self.cache.load_full() {
            Some(entry) => Ok(template_data_to_json(&entry.data)?),
            None => Err(no_template_error()),
        }
    }

    /// The instant the cached template was installed, if any.
    pub fn fetch_time(&self) -> Option<DateTime<Utc>> {
        self.cache.load().as_ref().map(|entry| entry.fetch_time)
    }

    /// Evaluates the cached template against `context` and returns the
    /// resolved [`ServerConfig`].
    ///
    /// The result starts from the in-app defaults given at template creation
    /// (provenance [`ValueSource::Default`]). For every template parameter,
    /// the first condition in template order that has an override and
    /// evaluated `true` supplies the winning value; otherwise the parameter
    /// default does. A winning explicit value overlays the entry with
    /// [`ValueSource::Remote`]; a winning in-app-default marker leaves the
    /// seeded default in place. Parameters with neither a remote value nor an
    /// in-app default are omitted and read as [`ValueSource::Static`].
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Configuration`] error when no template has been
    /// loaded yet.
    pub fn evaluate(&self, context: &EvaluationContext) -> Result<ServerConfig, ClientError> {
        let Some(entry) = self.cache.load_full() else {
            return Err(no_template_error());
        };
        let data = &entry.data;
        let results = evaluate_conditions(data.conditions.as_slice(), context);

        let mut values: HashMap<String, Value> = self
            .default_config
            .iter()
            .map(|(key, default)| {
                (
                    key.clone(),
                    Value::new(ValueSource::Default, default.clone()),
                )
            })
            .collect();
        for (name, parameter) in &data.parameters {
            // Template condition order is priority order; conditional-value
            // keys that name no condition are ignored.
            let conditional = data.conditions.iter().find_map(|named| {
                parameter
                    .conditional_values
                    .get(named.name.as_str())
                    .filter(|_| results.get(named.name.as_str()).copied().unwrap_or(false))
            });
            match conditional.or(parameter.default_value.as_ref()) {
                Some(ParameterValue::Value(value)) => {
                    values.insert(
                        name.clone(),
                        Value::new(ValueSource::Remote, value.clone()),
                    );
                }
                // The winning in-app-default marker (or nothing winning at
                // all) leaves the seeded default in place.
                Some(ParameterValue::UseInAppDefault) => {
                    debug!("Parameter '{name}' defers to the in-app default.");
                }
                None => {}
            }
        }
        Ok(ServerConfig::new(values))
    }

    fn store(&self, data: ServerTemplateData) {
        self.cache.store(Some(Arc::new(TemplateEntry {
            data,
            fetch_time: Utc::now(),
        })));
    }
}

fn no_template_error() -> ClientError {
    let err = ClientError::new(
        ErrorKind::Configuration,
        "No Remote Config server template in cache. Call load() before evaluate().".to_owned(),
    );
    error!(event_id = err.kind.event_id(); "{err}");
    err
}

/// In-app defaults are frozen to strings once, at construction: strings pass
/// through verbatim, nulls become empty, everything else is JSON-encoded.
fn stringify_default(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::default(),
        serde_json::Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}
