//! Error types for `WordPress` API calls.
//!
//! None of these escape a publish run. [`WordPressClient::execute`] logs them
//! and reports "no result" so the caller can abandon the one unit of work
//! that needed the response.
//!
//! [`WordPressClient::execute`]: crate::WordPressClient::execute

/// The request never produced an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A response that cannot be used as a JSON result.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// No response at all.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Server returned a non-2xx status.
    #[error("Request is unsuccessful: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// No `Content-Type` header.
    #[error("Content-Type is undefined")]
    MissingContentType,

    /// `Content-Type` is not `application/json`.
    #[error("Content-Type must be application/json, got {0}")]
    UnexpectedContentType(String),

    /// 2xx with nothing in the body.
    #[error("Response is empty")]
    EmptyBody,

    /// Body is not valid JSON.
    #[error("Unable to parse the response: {0}")]
    Json(#[from] serde_json::Error),
}
