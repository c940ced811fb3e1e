use crate::builder::{ClientBuilder, Options};
use crate::errors::ClientError;
use crate::fetch::fetcher::Fetcher;
use crate::template::ServerTemplate;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// The entry point for server-side Remote Config: binds a project to an HTTP
/// transport and hands out [`ServerTemplate`]s.
///
/// A single [`Client`] is safe for concurrent use by multiple tasks.
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
///     let context = EvaluationContext::new()
///         .randomization_id("user-1234")
///         .signal("tier", "paid");
///     let config = template.evaluate(&context).unwrap();
///     println!("{}", config.get_string("welcome_message"));
/// }
/// ```
pub struct Client {
    options: Arc<Options>,
    fetcher: Arc<Fetcher>,
}

impl Client {
    pub(crate) fn with_options(options: Options) -> Result<Self, ClientError> {
        let fetcher = Fetcher::new(
            options.base_url(),
            options.project_id(),
            options.http_timeout(),
            options.http_client().cloned(),
        )?;
        Ok(Self {
            options: Arc::new(options),
            fetcher: Arc::new(fetcher),
        })
    }

    /// Creates a new [`ClientBuilder`] used to build a [`Client`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use firebase_remote_config::Client;
    ///
    /// let client = Client::builder("my-project")
    ///     .http_timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder(project_id: &str) -> ClientBuilder {
        ClientBuilder::new(project_id)
    }

    /// Creates a new [`Client`] with default options.
    ///
    /// # Errors
    ///
    /// This method fails if the given project id is empty.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use firebase_remote_config::Client;
    ///
    /// let client = Client::new("my-project").unwrap();
    /// ```
    pub fn new(project_id: &str) -> Result<Self, ClientError> {
        ClientBuilder::new(project_id).build()
    }

    /// Creates a [`ServerTemplate`] seeded with `defaults` and loads the
    /// current template from the remote endpoint.
    ///
    /// Defaults follow the frozen stringification rule: strings pass through
    /// verbatim, nulls become the empty string, everything else is
    /// JSON-encoded once.
    ///
    /// # Errors
    ///
    /// Propagates any transport, remote, or codec failure from the initial
    /// load.
    pub async fn get_server_template(
        &self,
        defaults: HashMap<String, serde_json::Value>,
    ) -> Result<ServerTemplate, ClientError> {
        let template = ServerTemplate::new(Arc::clone(&self.fetcher), defaults);
        template.load().await?;
        Ok(template)
    }

    /// Creates a [`ServerTemplate`] seeded with `defaults` without any
    /// network round-trip, optionally initialized from a template JSON
    /// document (e.g. one captured earlier with
    /// [`ServerTemplate::to_json`]).
    ///
    /// # Errors
    ///
    /// Returns a codec error when `json` is given but does not parse.
    pub fn init_server_template(
        &self,
        defaults: HashMap<String, serde_json::Value>,
        json: Option<&str>,
    ) -> Result<ServerTemplate, ClientError> {
        let template = ServerTemplate::new(Arc::clone(&self.fetcher), defaults);
        if let Some(json) = json {
            template.set(json)?;
        }
        Ok(template)
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
