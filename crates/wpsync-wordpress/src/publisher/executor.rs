//! Publisher implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};
use wpsync_source::LocalDocument;

use crate::client::WordPressClient;
use crate::matcher::match_documents;
use crate::resolver::{ParentResolver, TaxonomyIndex};
use crate::types::RemoteDocument;

use super::PublishConfig;
use super::payload::{base_payload, publish_date};
use super::result::{DocumentOutcome, DocumentResult, PublishReport};

/// Caches that live for one run.
struct RunState {
    parents: ParentResolver,
    taxonomies: TaxonomyIndex,
}

/// Publishes batches of local documents to `WordPress`.
pub struct Publisher<'a> {
    client: &'a WordPressClient,
    config: PublishConfig,
}

impl<'a> Publisher<'a> {
    /// Create a new publisher.
    #[must_use]
    pub fn new(client: &'a WordPressClient, config: PublishConfig) -> Self {
        Self { client, config }
    }

    /// Publish a batch.
    ///
    /// Returns `false` only when there is nothing to publish; individual
    /// document failures are logged and do not change the result.
    pub fn publish(&self, documents: &[LocalDocument]) -> bool {
        self.publish_with_report(documents).is_some()
    }

    /// Publish a batch and report what happened to each document.
    ///
    /// Returns `None` when there is nothing to publish.
    pub fn publish_with_report(&self, documents: &[LocalDocument]) -> Option<PublishReport> {
        self.publish_at(documents, Utc::now())
    }

    pub(crate) fn publish_at(
        &self,
        documents: &[LocalDocument],
        now: DateTime<Utc>,
    ) -> Option<PublishReport> {
        if documents.is_empty() {
            info!("No file to upload");
            return None;
        }

        let document_type = &self.config.document_type;
        let Some(existing) = match_documents(self.client, document_type, documents) else {
            error!(
                "Unable to look up existing {}, nothing was published",
                document_type.url_path()
            );
            return Some(PublishReport {
                documents: documents
                    .iter()
                    .map(|document| DocumentResult {
                        slug: document.slug.clone(),
                        outcome: DocumentOutcome::Failed {
                            reason: "existing documents could not be looked up".to_owned(),
                        },
                    })
                    .collect(),
            });
        };

        let mut state = RunState {
            parents: ParentResolver::new(),
            taxonomies: if document_type.capabilities().taxonomies {
                TaxonomyIndex::build(self.client, document_type, documents)
            } else {
                TaxonomyIndex::default()
            },
        };

        let date = publish_date(now);
        let results = documents
            .iter()
            .map(|document| DocumentResult {
                slug: document.slug.clone(),
                outcome: self.reconcile(document, &existing, &mut state, &date),
            })
            .collect();

        Some(PublishReport { documents: results })
    }

    fn reconcile(
        &self,
        document: &LocalDocument,
        existing: &HashMap<String, RemoteDocument>,
        state: &mut RunState,
        date: &str,
    ) -> DocumentOutcome {
        let document_type = &self.config.document_type;
        let capabilities = document_type.capabilities();
        let mut payload = base_payload(document, &self.config, date);

        if capabilities.taxonomies {
            for assignment in &document.taxonomies {
                let ids = state.taxonomies.resolve(&document.slug, assignment);
                payload.insert(assignment.key.clone(), Value::from(ids));
            }
        }

        if capabilities.parent
            && let Some(path) = document.parent_path.as_deref()
        {
            let Some(parent) = state.parents.resolve(self.client, document_type, path) else {
                warn!(
                    "No page found for path: {path}, unable to publish {} to WordPress",
                    document.slug
                );
                return DocumentOutcome::Skipped {
                    reason: format!("no page found for path {path}"),
                };
            };
            payload.insert("parent".to_owned(), Value::from(parent.id));
        }

        match existing.get(&document.slug) {
            Some(remote) => self.update(document, remote.id, payload),
            None => self.create(document, &payload),
        }
    }

    fn update(&self, document: &LocalDocument, id: u64, mut payload: Map<String, Value>) -> DocumentOutcome {
        let document_type = &self.config.document_type;
        payload.insert("id".to_owned(), Value::from(id));
        let body = Value::Object(payload.clone());
        debug!(payload = %body, "Update payload");

        if self.config.dry_run {
            info!("Would update the {document_type} with id: {id} and slug: {}", document.slug);
            return DocumentOutcome::WouldUpdate { id };
        }

        match self.client.update_document(document_type, id, &payload) {
            Some(id) => {
                info!(
                    "Successfully updated the {document_type} with id: {id} and slug: {}",
                    document.slug
                );
                DocumentOutcome::Updated { id }
            }
            None => {
                error!(
                    "Unable to update the {document_type} with id: {id} and slug: {}",
                    document.slug
                );
                DocumentOutcome::Failed {
                    reason: format!("update of {id} failed"),
                }
            }
        }
    }

    fn create(&self, document: &LocalDocument, payload: &Map<String, Value>) -> DocumentOutcome {
        let document_type = &self.config.document_type;
        let body = Value::Object(payload.clone());
        debug!(payload = %body, "Create payload");

        if self.config.dry_run {
            info!("Would create a new {document_type} with slug: {}", document.slug);
            return DocumentOutcome::WouldCreate;
        }

        match self.client.create_document(document_type, payload) {
            Some(id) => {
                info!(
                    "Successfully created a new {document_type} with id: {id} and slug: {}",
                    document.slug
                );
                DocumentOutcome::Created { id }
            }
            None => {
                error!(
                    "Unable to create a new {document_type} with slug: {}",
                    document.slug
                );
                DocumentOutcome::Failed {
                    reason: "create failed".to_owned(),
                }
            }
        }
    }
}
