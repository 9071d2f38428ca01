//! Local document types.

use std::path::PathBuf;

/// Term values assigned to one taxonomy, in authoring order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyAssignment {
    /// Taxonomy key as registered remotely (e.g. "topic").
    pub key: String,
    /// Term slugs to attach.
    pub values: Vec<String>,
}

impl TaxonomyAssignment {
    /// Create an assignment.
    pub fn new(key: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A built document ready to be published.
///
/// `slug` and `title` are guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDocument {
    /// Stable key matching the remote resource.
    pub slug: String,
    /// Document title.
    pub title: String,
    /// Tag names. Kept for reporting, not sent.
    pub tags: Vec<String>,
    /// Taxonomy assignments.
    pub taxonomies: Vec<TaxonomyAssignment>,
    /// Raw HTML body.
    pub content: String,
    /// Hierarchical path of the parent page (e.g. "/docs/labs/").
    pub parent_path: Option<String>,
    /// HTML file the document was built from.
    pub source_path: PathBuf,
}

impl LocalDocument {
    /// Create a document with no tags, taxonomies or parent.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            tags: Vec::new(),
            taxonomies: Vec::new(),
            content: content.into(),
            parent_path: None,
            source_path: PathBuf::new(),
        }
    }

    /// Add a taxonomy assignment.
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: TaxonomyAssignment) -> Self {
        self.taxonomies.push(taxonomy);
        self
    }

    /// Set the parent path. Blank paths are ignored.
    #[must_use]
    pub fn with_parent_path(mut self, parent_path: impl Into<String>) -> Self {
        let parent_path = parent_path.into();
        self.parent_path = (!parent_path.trim().is_empty()).then_some(parent_path);
        self
    }
}
