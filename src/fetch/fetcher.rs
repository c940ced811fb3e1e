use std::time::Duration;

use log::{debug, error};
use reqwest::header::{ETAG, IF_NONE_MATCH};
use serde::Deserialize;

use crate::constants::{PKG_VERSION, RUST_VERSION, SERVER_NAMESPACE};
use crate::errors::{ClientError, ErrorKind, RemoteErrorCode};
use crate::model::config::{template_data_from_json, ServerTemplateData};

const FIREBASE_CLIENT_HEADER: &str = "X-Firebase-Client";
const FIREBASE_ETAG_HEADER: &str = "X-Firebase-ETag";
const API_CLIENT_HEADER: &str = "x-goog-api-client";

#[derive(Debug)]
pub(crate) enum FetchResponse {
    Fetched(ServerTemplateData),
    NotModified,
    Failed(ClientError),
}

/// Issues template GETs against the Remote Config endpoint of one project.
///
/// Authentication is the transport's concern: callers that need credentials
/// inject a pre-configured [`reqwest::Client`] carrying them.
#[derive(Debug)]
pub(crate) struct Fetcher {
    http_client: reqwest::Client,
    template_url: String,
}

impl Fetcher {
    pub fn new(
        base_url: &str,
        project_id: &str,
        timeout: Duration,
        http_client: Option<reqwest::Client>,
    ) -> Result<Self, ClientError> {
        let http_client = match http_client {
            Some(client) => client,
            None => match reqwest::Client::builder().timeout(timeout).build() {
                Ok(client) => client,
                Err(err) => {
                    return Err(ClientError::new(
                        ErrorKind::Transport,
                        format!("Failed to initialize the HTTP transport. {err}"),
                    ))
                }
            },
        };
        Ok(Self {
            http_client,
            template_url: format!(
                "{base}/v1/projects/{project_id}/namespaces/{SERVER_NAMESPACE}/serverRemoteConfig",
                base = base_url.trim_end_matches('/')
            ),
        })
    }

    /// Fetches the server template. A non-empty `etag` is sent as
    /// `If-None-Match` so an unchanged template answers `304`.
    pub async fn fetch(&self, etag: &str) -> FetchResponse {
        let mut builder = self
            .http_client
            .get(self.template_url.as_str())
            .header(
                FIREBASE_CLIENT_HEADER,
                format!("fire-admin-rust/{PKG_VERSION}"),
            )
            .header(FIREBASE_ETAG_HEADER, "true")
            .header(
                API_CLIENT_HEADER,
                format!("gl-rust/{RUST_VERSION} fire-admin/{PKG_VERSION}"),
            );
        if !etag.is_empty() {
            builder = builder.header(IF_NONE_MATCH, etag.to_owned());
        }

        match builder.send().await {
            Ok(response) => match response.status().as_u16() {
                200 => {
                    debug!("Template fetch was successful: new template received");
                    let etag = response
                        .headers()
                        .get(ETAG)
                        .and_then(|header| header.to_str().ok())
                        .unwrap_or("")
                        .to_owned();
                    let body = match response.text().await {
                        Ok(body) => body,
                        Err(body_error) => {
                            let err = ClientError::new(
                                ErrorKind::Transport,
                                format!("Failed to read the template response body. {body_error}"),
                            );
                            error!(event_id = err.kind.event_id(); "{err}");
                            return FetchResponse::Failed(err);
                        }
                    };
                    match template_data_from_json(body.as_str()) {
                        // The body's own etag field is never trusted on this
                        // path; the response header is authoritative.
                        Ok(mut data) => {
                            data.etag = etag;
                            FetchResponse::Fetched(data)
                        }
                        Err(parse_error) => {
                            let err = ClientError::new(
                                ErrorKind::Codec,
                                format!("Fetching the template was successful but the HTTP response content was invalid. {parse_error}"),
                            );
                            error!(event_id = err.kind.event_id(); "{err}");
                            FetchResponse::Failed(err)
                        }
                    }
                }
                304 => {
                    debug!("Template fetch was successful: not modified");
                    FetchResponse::NotModified
                }
                status => {
                    let code = RemoteErrorCode::from_status(status);
                    let body = response.text().await.unwrap_or_default();
                    let message = match remote_error_message(body.as_str()) {
                        Some(remote_message) => remote_message,
                        None => format!(
                            "Unexpected HTTP response was received from the Remote Config endpoint. Status code: {status}"
                        ),
                    };
                    let err = ClientError::new(ErrorKind::Remote(code), message);
                    error!(event_id = err.kind.event_id(); "[{code}] {err}");
                    FetchResponse::Failed(err)
                }
            },
            Err(request_error) => {
                let message = if request_error.is_timeout() {
                    "Request timed out while trying to fetch the template.".to_owned()
                } else {
                    format!("Unexpected error occurred while trying to fetch the template. {request_error}")
                };
                let err = ClientError::new(ErrorKind::Transport, message);
                error!(event_id = err.kind.event_id(); "{err}");
                FetchResponse::Failed(err)
            }
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Pulls `error.message` out of a Google RPC error body, if there is one.
fn remote_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok()?.error?.message
}
