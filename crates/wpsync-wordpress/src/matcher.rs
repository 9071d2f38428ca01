//! Matching local documents with remote ones by slug.

use std::collections::HashMap;

use tracing::debug;
use wpsync_source::LocalDocument;

use crate::client::WordPressClient;
use crate::types::{DocumentType, RemoteDocument};

/// Find which documents of the batch already exist remotely.
///
/// Issues exactly one request for the whole batch. Returns `None` when that
/// request fails, since creates can then no longer be told from updates.
pub(crate) fn match_documents(
    client: &WordPressClient,
    document_type: &DocumentType,
    documents: &[LocalDocument],
) -> Option<HashMap<String, RemoteDocument>> {
    if documents.is_empty() {
        return Some(HashMap::new());
    }

    let slugs: Vec<&str> = documents.iter().map(|d| d.slug.as_str()).collect();
    let items = client.find_documents_by_slug(document_type, &slugs)?;
    debug!(local = slugs.len(), remote = items.len(), "Matched documents by slug");

    Some(
        items
            .into_iter()
            .map(|item| {
                (
                    item.slug.clone(),
                    RemoteDocument {
                        id: item.id,
                        slug: item.slug,
                        document_type: document_type.clone(),
                    },
                )
            })
            .collect(),
    )
}
