//! Local document discovery for wpsync.
//!
//! The build produces one HTML file per document and, next to it, a YAML
//! file with the same stem holding the document attributes:
//!
//! ```text
//! build/html/intro.html
//! build/html/intro.yml
//! ```
//!
//! ```yaml
//! slug: intro
//! title: Introduction
//! tags: [graphs]
//! taxonomies:
//!   - key: topic
//!     values: [graphs, cypher]
//! parent_path: /docs/labs/
//! ```
//!
//! [`DocumentScanner`] walks the configured source trees and turns every
//! valid pair into a [`LocalDocument`]. Pairs that cannot be used are logged
//! and skipped; a bad document never stops the others from loading.

mod document;
mod error;
mod metadata;
mod scanner;

pub use document::{LocalDocument, TaxonomyAssignment};
pub use error::SourceError;
pub use scanner::{DocumentScanner, load_documents};
