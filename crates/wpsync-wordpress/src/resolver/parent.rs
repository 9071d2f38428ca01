//! Parent page resolution from public paths.
//!
//! A document declares its parent by public path, e.g. `/docs/labs/`. The
//! last segment is the parent's slug, but slugs are only unique among
//! siblings, so each candidate's `link` must match the whole path.

use std::collections::HashMap;

use tracing::debug;

use crate::client::WordPressClient;
use crate::types::{DocumentItem, DocumentType, RemoteDocument};

/// Maximum number of same-slug candidates inspected.
const CANDIDATES_PER_SEARCH: u32 = 10;

/// Memoizing parent resolver, one per run.
#[derive(Debug, Default)]
pub struct ParentResolver {
    cache: HashMap<String, Option<RemoteDocument>>,
}

impl ParentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the document published at `path`.
    ///
    /// Every distinct path is searched at most once; misses are cached too.
    pub fn resolve(
        &mut self,
        client: &WordPressClient,
        document_type: &DocumentType,
        path: &str,
    ) -> Option<RemoteDocument> {
        if let Some(cached) = self.cache.get(path) {
            return cached.clone();
        }

        let found = search(client, document_type, path);
        self.cache.insert(path.to_owned(), found.clone());
        found
    }
}

fn search(client: &WordPressClient, document_type: &DocumentType, path: &str) -> Option<RemoteDocument> {
    let slug = candidate_slug(path)?;
    let candidates = client.search_documents(document_type, slug, CANDIDATES_PER_SEARCH)?;
    let target = trim_trailing_separator(path);
    debug!(path, slug, candidates = candidates.len(), "Searching parent");

    candidates
        .into_iter()
        .find(|item| link_path(item).is_some_and(|link| trim_trailing_separator(&link) == target))
        .map(|item| RemoteDocument {
            id: item.id,
            slug: item.slug,
            document_type: document_type.clone(),
        })
}

/// Last non-empty segment of `path`.
pub(crate) fn candidate_slug(path: &str) -> Option<&str> {
    trim_trailing_separator(path)
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
}

/// Drop one trailing `/`.
pub(crate) fn trim_trailing_separator(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

fn link_path(item: &DocumentItem) -> Option<String> {
    let uri: ureq::http::Uri = item.link.as_deref()?.parse().ok()?;
    Some(uri.path().to_owned())
}
