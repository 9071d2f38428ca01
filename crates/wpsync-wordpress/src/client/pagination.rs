//! Collection pagination.

use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiRequest, WordPressClient};
use crate::url::ApiUrl;

/// Page size used when listing whole collections.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Header carrying the number of pages of a collection.
const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

impl WordPressClient {
    /// Fetch every page of a collection.
    ///
    /// Requests `page=1..=N` with `per_page`, where N comes from the first
    /// page's `X-WP-TotalPages` header (1 when absent or unparseable). Each
    /// page's array goes through `mapper`; results are concatenated in page
    /// order. A failed page stops pagination with what was gathered so far.
    pub fn fetch_all_pages<T>(
        &self,
        base: &ApiUrl,
        per_page: u32,
        mapper: impl Fn(&[Value]) -> Vec<T>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        let mut page: u32 = 1;
        let mut total_pages: u32 = 1;

        while page <= total_pages {
            let url = base
                .clone()
                .query("page", page)
                .query("per_page", per_page);
            let Some(response) = self.execute_response(ApiRequest::get(url)) else {
                warn!(page, total_pages, "Stopping pagination after a failed page");
                break;
            };

            if page == 1 {
                total_pages = response
                    .header(TOTAL_PAGES_HEADER)
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(1);
                debug!(total_pages, "Paginating collection");
            }

            match response.body.as_array() {
                Some(values) => items.extend(mapper(values)),
                None => warn!(page, "Expected a JSON array page"),
            }
            page += 1;
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::client::tests::client;
    use crate::client::{Method, MockTransport, RawResponse};

    const PATH: &str = "/wp-json/wp/v2/topics";

    fn ids(values: &[Value]) -> Vec<u64> {
        values.iter().filter_map(|v| v["id"].as_u64()).collect()
    }

    fn page(ids: &[u64], total: Option<&str>) -> RawResponse {
        let body: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
        let response = RawResponse::json(200, &Value::Array(body));
        match total {
            Some(total) => response.with_header("X-WP-TotalPages", total),
            None => response,
        }
    }

    #[test]
    fn test_fetches_every_page_in_order() {
        let transport = MockTransport::new();
        transport.on_query(Method::Get, PATH, "page=1&", page(&[1, 2], Some("3")));
        transport.on_query(Method::Get, PATH, "page=2&", page(&[3, 4], Some("3")));
        transport.on_query(Method::Get, PATH, "page=3&", page(&[5], Some("3")));
        let client = client(&transport);

        let items = client.fetch_all_pages(&client.api_url().segment("topics"), 2, ids);

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/wp-json/wp/v2/topics?page=1&per_page=2",
                "https://example.com/wp-json/wp/v2/topics?page=2&per_page=2",
                "https://example.com/wp-json/wp/v2/topics?page=3&per_page=2",
            ]
        );
    }

    #[test]
    fn test_missing_total_pages_means_one_page() {
        let transport = MockTransport::new();
        transport.on(Method::Get, PATH, page(&[7], None));
        let client = client(&transport);

        let items = client.fetch_all_pages(&client.api_url().segment("topics"), 100, ids);

        assert_eq!(items, vec![7]);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_unparseable_total_pages_means_one_page() {
        let transport = MockTransport::new();
        transport.on(Method::Get, PATH, page(&[7], Some("many")));
        let client = client(&transport);

        let items = client.fetch_all_pages(&client.api_url().segment("topics"), 100, ids);

        assert_eq!(items, vec![7]);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_failed_page_keeps_earlier_pages() {
        let transport = MockTransport::new();
        transport.on_query(Method::Get, PATH, "page=1&", page(&[1], Some("3")));
        transport.on_query(Method::Get, PATH, "page=2&", RawResponse::new(500));
        transport.on_query(Method::Get, PATH, "page=3&", page(&[3], Some("3")));
        let client = client(&transport);

        let items = client.fetch_all_pages(&client.api_url().segment("topics"), 1, ids);

        assert_eq!(items, vec![1]);
        assert_eq!(transport.requests().len(), 2);
    }
}
