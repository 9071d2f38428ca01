//! Taxonomy operations for the `WordPress` API.

use serde_json::Value;
use tracing::{debug, warn};

use super::pagination::DEFAULT_PER_PAGE;
use super::{ApiRequest, WordPressClient};
use crate::types::{TaxonomyEndpoint, TermItem};

impl WordPressClient {
    /// Get the taxonomy registry, an object keyed by taxonomy.
    pub(crate) fn taxonomy_registry(&self) -> Option<Value> {
        self.execute(ApiRequest::get(self.api_url().segment("taxonomies")))
    }

    /// List every term of a taxonomy.
    pub(crate) fn taxonomy_terms(&self, endpoint: &TaxonomyEndpoint) -> Vec<TermItem> {
        let terms = self.fetch_all_pages(
            &self.api_url().segment(&endpoint.rest_base),
            DEFAULT_PER_PAGE,
            |values| {
                values
                    .iter()
                    .filter_map(|value| match serde_json::from_value(value.clone()) {
                        Ok(term) => Some(term),
                        Err(err) => {
                            warn!(taxonomy = %endpoint.key, "Ignoring malformed term: {err}");
                            None
                        }
                    })
                    .collect()
            },
        );
        debug!(taxonomy = %endpoint.key, count = terms.len(), "Fetched taxonomy terms");
        terms
    }
}
