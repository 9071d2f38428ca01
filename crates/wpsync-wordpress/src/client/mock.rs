//! Mock transport for unit tests.
//!
//! Provides [`MockTransport`] for exercising the client without a server.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use serde_json::json;

use super::transport::{ApiRequest, Method, RawResponse, Transport};
use crate::error::TransportError;

/// Canned response list for one route.
#[derive(Debug)]
struct Route {
    method: Method,
    path: String,
    query: Option<String>,
    /// The last response is repeated once the others are used up.
    responses: VecDeque<RawResponse>,
}

impl Route {
    fn matches(&self, method: Method, path: &str, query: &str) -> bool {
        self.method == method
            && self.path == path
            && self.query.as_deref().is_none_or(|q| query.contains(q))
    }

    fn next_response(&mut self) -> RawResponse {
        if self.responses.len() > 1 {
            self.responses.pop_front().unwrap_or_else(not_found)
        } else {
            self.responses.front().cloned().unwrap_or_else(not_found)
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<ApiRequest>,
}

/// Recording transport answering from canned responses.
///
/// Routes match on method and URL path, optionally narrowed by a query
/// substring. Routes with a query filter win over plain ones. Unmatched
/// requests get a JSON 404. Clones share state, so a test can keep one
/// handle and give the other to the client.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<RwLock<MockState>>,
}

impl MockTransport {
    /// Create a transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `method path` with `response`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn on(&self, method: Method, path: &str, response: RawResponse) {
        self.add_route(method, path, None, vec![response]);
    }

    /// Answer `method path` with `response` when the query contains `query`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn on_query(&self, method: Method, path: &str, query: &str, response: RawResponse) {
        self.add_route(method, path, Some(query.to_owned()), vec![response]);
    }

    /// Answer `method path` with `responses` in order, repeating the last.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn on_sequence(&self, method: Method, path: &str, responses: Vec<RawResponse>) {
        self.add_route(method, path, None, responses);
    }

    /// All requests sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.read().unwrap().requests.clone()
    }

    /// Number of requests sent to `method path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == method && split_url(&request.url).0 == path)
            .count()
    }

    fn add_route(&self, method: Method, path: &str, query: Option<String>, responses: Vec<RawResponse>) {
        self.state.write().unwrap().routes.push(Route {
            method,
            path: path.to_owned(),
            query,
            responses: responses.into(),
        });
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.state.write().unwrap();
        state.requests.push(request.clone());

        let (path, query) = split_url(&request.url);
        let route = state
            .routes
            .iter()
            .position(|r| r.query.is_some() && r.matches(request.method, &path, &query))
            .or_else(|| {
                state
                    .routes
                    .iter()
                    .position(|r| r.query.is_none() && r.matches(request.method, &path, &query))
            });

        Ok(match route {
            Some(index) => state.routes[index].next_response(),
            None => not_found(),
        })
    }
}

/// Split a URL into path and query.
fn split_url(url: &str) -> (String, String) {
    match url.parse::<ureq::http::Uri>() {
        Ok(uri) => (
            uri.path().to_owned(),
            uri.query().unwrap_or_default().to_owned(),
        ),
        Err(_) => (url.to_owned(), String::new()),
    }
}

fn not_found() -> RawResponse {
    RawResponse::json(
        404,
        &json!({"code": "rest_no_route", "message": "No route was found"}),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn send(transport: &MockTransport, url: &str) -> u16 {
        transport.send(&ApiRequest::get(url)).unwrap().status
    }

    #[test]
    fn test_unmatched_is_not_found() {
        let transport = MockTransport::new();
        assert_eq!(send(&transport, "https://example.com/missing"), 404);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_query_route_wins() {
        let transport = MockTransport::new();
        transport.on(Method::Get, "/items", RawResponse::new(200));
        transport.on_query(Method::Get, "/items", "page=2", RawResponse::new(204));

        assert_eq!(send(&transport, "https://example.com/items?page=1"), 200);
        assert_eq!(send(&transport, "https://example.com/items?page=2"), 204);
        assert_eq!(transport.count(Method::Get, "/items"), 2);
    }

    #[test]
    fn test_sequence_repeats_last() {
        let transport = MockTransport::new();
        transport.on_sequence(
            Method::Get,
            "/items",
            vec![RawResponse::new(401), RawResponse::new(200)],
        );

        assert_eq!(send(&transport, "https://example.com/items"), 401);
        assert_eq!(send(&transport, "https://example.com/items"), 200);
        assert_eq!(send(&transport, "https://example.com/items"), 200);
    }
}
