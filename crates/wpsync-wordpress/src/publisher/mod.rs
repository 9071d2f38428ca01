//! Reconciliation of a batch of local documents with `WordPress`.
//!
//! [`Publisher`] runs the whole pipeline for one document type:
//!
//! 1. Match the batch against existing documents by slug (one request)
//! 2. Index the terms of every taxonomy the batch references
//! 3. Per document, build the payload, resolve taxonomy terms and the parent
//! 4. Update documents that exist, create the others
//!
//! Nothing in a batch fails the batch: unresolved references degrade the
//! payload or skip the document, failed calls fail that document only.

mod executor;
mod payload;
mod result;

pub use executor::Publisher;
pub use result::{DocumentOutcome, DocumentResult, PublishReport};

use wpsync_config::PublishStatus;

use crate::types::DocumentType;

/// Configuration for a publish run.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Type of every document in the batch.
    pub document_type: DocumentType,
    /// Status given to created and updated documents.
    pub status: PublishStatus,
    /// Page template; left out of payloads when blank.
    pub template: String,
    /// Resolve everything but send no create or update.
    pub dry_run: bool,
}
