//! `WordPress` publishing for wpsync.
//!
//! This crate reconciles locally built documents with a `WordPress` site
//! through the `/wp-json/wp/v2` REST API:
//! - [`WordPressClient`]: authenticated, paginated JSON client
//! - [`Publisher`](publisher::Publisher): create-or-update workflow keyed by slug
//!
//! Remote state is always overwritten by local state. Nothing is deleted.
//!
//! # Example
//!
//! ```no_run
//! use wpsync_config::{PublishStatus, WordPressConfig};
//! use wpsync_source::LocalDocument;
//! use wpsync_wordpress::{DocumentType, PublishConfig, Publisher, WordPressClient};
//!
//! let client = WordPressClient::from_config(&WordPressConfig {
//!     host: "blog.example.com".to_owned(),
//!     username: "publisher".to_owned(),
//!     password: "app-password".to_owned(),
//!     ..Default::default()
//! });
//! let config = PublishConfig {
//!     document_type: DocumentType::new("post"),
//!     status: PublishStatus::Draft,
//!     template: String::new(),
//!     dry_run: false,
//! };
//! let documents = vec![LocalDocument::new("intro", "Introduction", "<p>Hello</p>")];
//!
//! let published = Publisher::new(&client, config).publish(&documents);
//! assert!(published);
//! ```

// API client
mod client;
pub use client::{
    ApiRequest, DEFAULT_PER_PAGE, Method, RawResponse, Transport, UreqTransport, WordPressClient,
};

// Lookups
mod matcher;
pub mod resolver;

// Types
mod types;
pub use types::{Capabilities, DocumentType, RemoteDocument, TaxonomyEndpoint};

mod url;
pub use url::ApiUrl;

// Publishing workflow
pub mod publisher;
pub use publisher::{DocumentOutcome, DocumentResult, PublishConfig, PublishReport, Publisher};

// Errors
pub mod error;
pub use error::{ResponseError, TransportError};
