//! `WordPress` REST API client.
//!
//! Provides a sync HTTP client for the `wp/v2` REST API with HTTP Basic
//! authentication. Every call returns `Option`: failures are logged here and
//! the caller abandons whatever needed the response.

mod documents;
#[cfg(test)]
mod mock;
mod pagination;
mod taxonomies;
mod transport;

#[cfg(test)]
pub use mock::MockTransport;
pub use pagination::DEFAULT_PER_PAGE;
pub use transport::{ApiRequest, Method, RawResponse, Transport, UreqTransport};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{debug, error, warn};
use wpsync_config::WordPressConfig;

use crate::error::ResponseError;
use crate::url::ApiUrl;

/// Path of the REST API below the site root.
const API_PATH: &str = "wp-json/wp/v2";

/// Media type every successful response must carry.
const JSON_MEDIA_TYPE: &str = "application/json";

/// `WordPress` REST API client.
pub struct WordPressClient {
    transport: Box<dyn Transport>,
    base_url: String,
    authorization: String,
    auth_retry_limit: u32,
}

/// Parsed JSON body of a successful response plus its headers.
#[derive(Debug, Clone)]
pub(crate) struct JsonResponse {
    pub body: Value,
    pub headers: Vec<(String, String)>,
}

impl JsonResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        transport::find_header(&self.headers, name)
    }
}

impl WordPressClient {
    /// Create a client talking to the configured site over HTTP.
    pub fn from_config(config: &WordPressConfig) -> Self {
        let transport = UreqTransport::new(
            config.connect_timeout(),
            config.write_timeout(),
            config.read_timeout(),
        );
        Self::with_transport(config, transport)
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: &WordPressConfig, transport: impl Transport + 'static) -> Self {
        let credentials = format!("{}:{}", config.username, config.password);
        Self {
            transport: Box::new(transport),
            base_url: format!(
                "{}://{}/{API_PATH}",
                config.scheme,
                config.host.trim_end_matches('/')
            ),
            authorization: format!("Basic {}", STANDARD.encode(credentials)),
            auth_retry_limit: config.auth_retry_limit.max(1),
        }
    }

    /// Root URL of the REST API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builder rooted at the REST API.
    pub fn api_url(&self) -> ApiUrl {
        ApiUrl::new(self.base_url.as_str())
    }

    /// Send a request and return its JSON body.
    ///
    /// Returns `None` when the request fails, the status is not 2xx, the
    /// content type is not JSON, the body is empty or does not parse. The
    /// reason is logged.
    pub fn execute(&self, request: ApiRequest) -> Option<Value> {
        self.execute_response(request).map(|response| response.body)
    }

    pub(crate) fn execute_response(&self, request: ApiRequest) -> Option<JsonResponse> {
        let url = request.url.clone();
        match self.try_execute(request) {
            Ok(response) => Some(response),
            Err(ResponseError::Json(err)) => {
                error!(%url, "Unable to parse the response: {err}");
                None
            }
            Err(err) => {
                warn!(%url, "{err}");
                None
            }
        }
    }

    fn try_execute(&self, request: ApiRequest) -> Result<JsonResponse, ResponseError> {
        debug!(method = request.method.as_str(), url = %request.url, "Sending request");
        let response = self.send_authenticated(request)?;

        if !response.is_success() {
            return Err(ResponseError::Status {
                status: response.status,
                body: response.body,
            });
        }

        let content_type = response
            .header("Content-Type")
            .ok_or(ResponseError::MissingContentType)?;
        if !is_json_media_type(content_type) {
            return Err(ResponseError::UnexpectedContentType(content_type.to_owned()));
        }

        if response.body.trim().is_empty() {
            return Err(ResponseError::EmptyBody);
        }

        let body = serde_json::from_str(&response.body)?;
        Ok(JsonResponse {
            body,
            headers: response.headers,
        })
    }

    /// Send with credentials attached, re-sending while the server keeps
    /// challenging until `auth_retry_limit` responses have been received.
    fn send_authenticated(&self, request: ApiRequest) -> Result<RawResponse, ResponseError> {
        let request = request.with_header("Authorization", &self.authorization);
        let mut response = self.transport.send(&request)?;
        let mut responses = 1;

        while response.is_auth_challenge() && responses < self.auth_retry_limit {
            debug!(
                status = response.status,
                attempt = responses,
                "Authentication challenged, retrying with credentials"
            );
            response = self.transport.send(&request)?;
            responses += 1;
        }

        Ok(response)
    }
}

/// Compare the media type, ignoring parameters such as `charset`.
fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}
