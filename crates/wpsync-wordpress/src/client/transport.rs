//! HTTP transport seam.
//!
//! [`WordPressClient`](super::WordPressClient) only knows about
//! [`ApiRequest`] and [`RawResponse`]; the [`Transport`] trait moves them over
//! the wire. [`UreqTransport`] is the real implementation.

use std::time::Duration;

use ureq::Agent;

use crate::error::TransportError;

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// An HTTP request to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// GET request expecting JSON.
    pub fn get(url: impl ToString) -> Self {
        Self {
            method: Method::Get,
            url: url.to_string(),
            headers: vec![("Accept".to_owned(), "application/json".to_owned())],
            body: None,
        }
    }

    /// POST request with a JSON body.
    pub fn post_json(url: impl ToString, payload: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: Method::Post,
            url: url.to_string(),
            headers: vec![
                ("Accept".to_owned(), "application/json".to_owned()),
                (
                    "Content-Type".to_owned(),
                    "application/json; charset=utf-8".to_owned(),
                ),
            ],
            body: Some(serde_json::to_vec(payload)?),
        })
    }

    /// Set a header, replacing any existing value (names compare case-insensitively).
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body parsed as JSON, if any.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// An HTTP response with its body read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    /// Response with a status and no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// `application/json` response.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json; charset=UTF-8")
            .with_body(body.to_string())
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value (case-insensitive name).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the server asks for (other) credentials.
    pub fn is_auth_challenge(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Header value by case-insensitive name.
pub(super) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Sends requests and returns whatever the server answered.
///
/// Implementations must not treat HTTP error statuses as errors; only
/// failures to obtain a response are.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

/// Blocking transport backed by a [`ureq::Agent`].
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Create a transport with fixed connect, write and read timeouts.
    pub fn new(connect_timeout: Duration, write_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .timeout_send_request(Some(write_timeout))
            .timeout_send_body(Some(write_timeout))
            .timeout_recv_response(Some(read_timeout))
            .timeout_recv_body(Some(read_timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let response = match request.method {
            Method::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()?
            }
            Method::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(request.body.as_deref().unwrap_or_default())?
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();
        let mut body_reader = response.into_body();
        let body = body_reader.read_to_string()?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
