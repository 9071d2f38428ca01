//! Document operations for the `WordPress` API.

use serde_json::{Map, Value};
use tracing::warn;

use super::{ApiRequest, WordPressClient};
use crate::types::{DocumentItem, DocumentType};
use crate::url::ApiUrl;

/// Every status a lookup must see, so drafts and scheduled documents are
/// matched instead of duplicated.
pub(crate) const ALL_STATUSES: &str = "publish,future,draft,pending,private";

impl WordPressClient {
    fn collection_url(&self, document_type: &DocumentType) -> ApiUrl {
        self.api_url().segment(document_type.url_path())
    }

    /// Look up documents by slug with a single request.
    pub(crate) fn find_documents_by_slug(
        &self,
        document_type: &DocumentType,
        slugs: &[&str],
    ) -> Option<Vec<DocumentItem>> {
        let url = self
            .collection_url(document_type)
            .query("per_page", slugs.len())
            .query("slug", slugs.join(","))
            .query("status", ALL_STATUSES);
        self.document_list(url)
    }

    /// Search documents whose slug is `slug`, at most `per_page` of them.
    pub(crate) fn search_documents(
        &self,
        document_type: &DocumentType,
        slug: &str,
        per_page: u32,
    ) -> Option<Vec<DocumentItem>> {
        let url = self
            .collection_url(document_type)
            .query("per_page", per_page)
            .query("slug", slug)
            .query("status", ALL_STATUSES);
        self.document_list(url)
    }

    /// Create a document, returning its new id.
    pub(crate) fn create_document(
        &self,
        document_type: &DocumentType,
        payload: &Map<String, Value>,
    ) -> Option<u64> {
        self.post_document(self.collection_url(document_type), payload)
    }

    /// Update the document `id`, returning the id the server reports.
    pub(crate) fn update_document(
        &self,
        document_type: &DocumentType,
        id: u64,
        payload: &Map<String, Value>,
    ) -> Option<u64> {
        self.post_document(self.collection_url(document_type).segment(id), payload)
    }

    fn post_document(&self, url: ApiUrl, payload: &Map<String, Value>) -> Option<u64> {
        let request = match ApiRequest::post_json(url, &Value::Object(payload.clone())) {
            Ok(request) => request,
            Err(err) => {
                warn!("Unable to serialize the payload: {err}");
                return None;
            }
        };
        let body = self.execute(request)?;
        let id = body.get("id").and_then(Value::as_u64);
        if id.is_none() {
            warn!("Response has no numeric id");
        }
        id
    }

    fn document_list(&self, url: ApiUrl) -> Option<Vec<DocumentItem>> {
        let body = self.execute(ApiRequest::get(url))?;
        match serde_json::from_value(body) {
            Ok(items) => Some(items),
            Err(err) => {
                warn!("Unexpected document list: {err}");
                None
            }
        }
    }
}
