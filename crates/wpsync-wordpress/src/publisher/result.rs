//! Publish outcomes.

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// New document created with this id.
    Created { id: u64 },
    /// Existing document updated.
    Updated { id: u64 },
    /// Dry run: would have been created.
    WouldCreate,
    /// Dry run: would have updated this id.
    WouldUpdate { id: u64 },
    /// Not sent because a reference could not be resolved.
    Skipped { reason: String },
    /// Sent (or about to be) but no usable answer came back.
    Failed { reason: String },
}

/// Outcome of one document, by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentResult {
    pub slug: String,
    pub outcome: DocumentOutcome,
}

/// Outcomes of a whole run, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub documents: Vec<DocumentResult>,
}

impl PublishReport {
    /// Outcome for `slug`, if it was part of the batch.
    pub fn outcome(&self, slug: &str) -> Option<&DocumentOutcome> {
        self.documents
            .iter()
            .find(|result| result.slug == slug)
            .map(|result| &result.outcome)
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Created { .. } | DocumentOutcome::WouldCreate))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Updated { .. } | DocumentOutcome::WouldUpdate { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed { .. }))
    }

    /// Whether every document was created or updated (or would be).
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents
            .iter()
            .filter(|result| predicate(&result.outcome))
            .count()
    }
}
