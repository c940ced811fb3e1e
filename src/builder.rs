use crate::constants::DEFAULT_BASE_URL;
use crate::errors::{ClientError, ErrorKind};
use crate::Client;
use std::time::Duration;

#[derive(Debug)]
pub struct Options {
    project_id: String,
    base_url: Option<String>,
    http_timeout: Duration,
    http_client: Option<reqwest::Client>,
}

impl Options {
    pub(crate) fn project_id(&self) -> &str {
        &self.project_id
    }

    pub(crate) fn base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.as_str(),
            None => DEFAULT_BASE_URL,
        }
    }

    pub(crate) fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    pub(crate) fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }
}

/// Builder to create a Remote Config [`Client`].
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
pub struct ClientBuilder {
    project_id: String,
    base_url: Option<String>,
    http_timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub(crate) fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_owned(),
            base_url: None,
            http_timeout: None,
            http_client: None,
        }
    }

    /// Sets a custom base URL for the Remote Config endpoint.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use firebase_remote_config::Client;
    ///
    /// let builder = Client::builder("my-project")
    ///     .base_url("https://my-proxy.example.com");
    /// ```
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_owned());
        self
    }

    /// Sets the HTTP request timeout.
    /// Default value is `30` seconds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use firebase_remote_config::Client;
    ///
    /// let builder = Client::builder("my-project")
    ///     .http_timeout(Duration::from_secs(60));
    /// ```
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Sets a pre-configured [`reqwest::Client`] used for all template
    /// fetches. This is where authentication lives: hand in a client whose
    /// default headers carry the service-account credentials. When omitted, a
    /// plain client with the configured timeout is built.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Creates the [`Client`] from the configuration made on the builder.
    ///
    /// # Errors
    ///
    /// This method fails when the project id is empty or the HTTP transport
    /// cannot be initialized.
    pub fn build(self) -> Result<Client, ClientError> {
        if self.project_id.is_empty() {
            return Err(ClientError::new(
                ErrorKind::Configuration,
                "Project id cannot be empty".to_owned(),
            ));
        }
        Client::with_options(self.build_options())
    }

    pub(crate) fn build_options(self) -> Options {
        Options {
            project_id: self.project_id,
            base_url: self.base_url,
            http_timeout: self.http_timeout.unwrap_or(Duration::from_secs(30)),
            http_client: self.http_client,
        }
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::constants::DEFAULT_BASE_URL;

    #[test]
    fn empty_project_id_is_rejected() {
        let err = ClientBuilder::new("").build().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn defaults() {
        let options = ClientBuilder::new("my-project").build_options();
        assert_eq!(options.project_id(), "my-project");
        assert_eq!(options.base_url(), DEFAULT_BASE_URL);
        assert_eq!(options.http_timeout(), Duration::from_secs(30));
        assert!(options.http_client().is_none());
    }

    #[test]
    fn overrides() {
        let options = ClientBuilder::new("my-project")
            .base_url("http://localhost:8080")
            .http_timeout(Duration::from_secs(5))
            .http_client(reqwest::Client::new())
            .build_options();
        assert_eq!(options.base_url(), "http://localhost:8080");
        assert_eq!(options.http_timeout(), Duration::from_secs(5));
        assert!(options.http_client().is_some());
    }
}
