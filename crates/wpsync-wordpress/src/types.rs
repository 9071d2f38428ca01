//! `WordPress` document and taxonomy types.

use std::fmt;

use serde::Deserialize;

/// What a document type supports when published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Taxonomy term IDs may be attached.
    pub taxonomies: bool,
    /// A parent document may be referenced.
    pub parent: bool,
}

impl Capabilities {
    /// Capabilities of types missing from the table (custom post types).
    pub const DEFAULT: Self = Self {
        taxonomies: true,
        parent: false,
    };
}

/// Capability table keyed by document type name.
const CAPABILITIES: &[(&str, Capabilities)] = &[
    (
        "post",
        Capabilities {
            taxonomies: true,
            parent: false,
        },
    ),
    (
        "page",
        Capabilities {
            taxonomies: false,
            parent: true,
        },
    ),
];

/// A `WordPress` document type such as "post" or "page".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentType {
    name: String,
}

impl DocumentType {
    /// Create a document type from its singular name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Singular type name, as sent in payloads.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collection endpoint name.
    ///
    /// Built-in types are singular but their endpoints are plural.
    pub fn url_path(&self) -> &str {
        match self.name.as_str() {
            "post" => "posts",
            "page" => "pages",
            other => other,
        }
    }

    /// Look up this type in the capability table.
    pub fn capabilities(&self) -> Capabilities {
        CAPABILITIES
            .iter()
            .find(|(name, _)| *name == self.name)
            .map_or(Capabilities::DEFAULT, |(_, capabilities)| *capabilities)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identity of a document that already exists remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub id: u64,
    pub slug: String,
    pub document_type: DocumentType,
}

/// A taxonomy usable with the current document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyEndpoint {
    /// Taxonomy key, also the payload field name.
    pub key: String,
    /// Collection endpoint listing the taxonomy's terms.
    pub rest_base: String,
}

/// Document as listed by a collection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DocumentItem {
    pub id: u64,
    pub slug: String,
    /// Public URL.
    #[serde(default)]
    pub link: Option<String>,
}

/// Taxonomy term as listed by a taxonomy endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TermItem {
    pub id: u64,
    pub slug: String,
}

/// Entry of the taxonomy registry.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaxonomyItem {
    #[serde(default)]
    pub slug: Option<String>,
    pub rest_base: String,
    #[serde(default)]
    pub types: Vec<String>,
}
