//! Taxonomy term resolution.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::{debug, warn};
use wpsync_source::{LocalDocument, TaxonomyAssignment};

use crate::client::WordPressClient;
use crate::types::{DocumentType, TaxonomyEndpoint, TaxonomyItem};

/// Term ids by taxonomy key and term slug.
#[derive(Debug, Default)]
pub struct TaxonomyIndex {
    terms: HashMap<String, HashMap<String, u64>>,
}

impl TaxonomyIndex {
    /// Index the terms of every taxonomy the batch references.
    ///
    /// The registry is only fetched when at least one document carries a
    /// taxonomy. Keys without an endpoint for `document_type` are logged and
    /// left out, so their values resolve to nothing.
    pub fn build(
        client: &WordPressClient,
        document_type: &DocumentType,
        documents: &[LocalDocument],
    ) -> Self {
        let mut index = Self::default();

        let keys: BTreeSet<&str> = documents
            .iter()
            .flat_map(|document| document.taxonomies.iter().map(|t| t.key.as_str()))
            .collect();
        if keys.is_empty() {
            return index;
        }

        let endpoints = client
            .taxonomy_registry()
            .map(|registry| applicable_endpoints(&registry, document_type.name()))
            .unwrap_or_default();
        debug!(count = endpoints.len(), "Discovered taxonomy endpoints");

        for key in keys {
            let Some(endpoint) = endpoints.get(key) else {
                warn!(
                    "Taxonomy: {key} does not exist, unable to set this taxonomy on {}",
                    document_type.url_path()
                );
                continue;
            };
            let terms = client
                .taxonomy_terms(endpoint)
                .into_iter()
                .map(|term| (term.slug, term.id))
                .collect();
            index.terms.insert(key.to_owned(), terms);
        }

        index
    }

    /// Register a term id.
    pub fn insert(&mut self, key: impl Into<String>, slug: impl Into<String>, id: u64) {
        self.terms
            .entry(key.into())
            .or_default()
            .insert(slug.into(), id);
    }

    /// Look up a term id.
    pub fn term_id(&self, key: &str, slug: &str) -> Option<u64> {
        self.terms.get(key)?.get(slug).copied()
    }

    /// Resolve an assignment's values to term ids, in order.
    ///
    /// Values without an id are dropped with a warning naming `document_slug`.
    pub fn resolve(&self, document_slug: &str, assignment: &TaxonomyAssignment) -> Vec<u64> {
        assignment
            .values
            .iter()
            .filter_map(|value| {
                let id = self.term_id(&assignment.key, value);
                if id.is_none() {
                    warn!(
                        "Unable to resolve taxonomy id for {}/{value} on post {document_slug}",
                        assignment.key
                    );
                }
                id
            })
            .collect()
    }
}

/// Taxonomies of the registry that apply to `type_name`, keyed by taxonomy.
///
/// Entries are keyed by their `slug`, falling back to the registry key.
pub(crate) fn applicable_endpoints(
    registry: &Value,
    type_name: &str,
) -> HashMap<String, TaxonomyEndpoint> {
    let Some(entries) = registry.as_object() else {
        warn!("Unexpected taxonomy registry, expected an object");
        return HashMap::new();
    };

    entries
        .iter()
        .filter_map(|(key, entry)| {
            let item: TaxonomyItem = serde_json::from_value(entry.clone()).ok()?;
            if !item.types.iter().any(|t| t == type_name) {
                return None;
            }
            let key = item.slug.unwrap_or_else(|| key.clone());
            Some((
                key.clone(),
                TaxonomyEndpoint {
                    key,
                    rest_base: item.rest_base,
                },
            ))
        })
        .collect()
}
