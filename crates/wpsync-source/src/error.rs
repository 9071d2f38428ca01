//! Errors raised while loading a single local document.

use std::path::PathBuf;

/// Reason a document could not be loaded.
///
/// Every variant names the file involved so the warning logged by the
/// scanner points at something the author can fix.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The sibling metadata file does not exist.
    #[error("Missing YAML file: {}", .0.display())]
    MissingMetadata(PathBuf),

    /// A file could not be read.
    #[error("Unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata file is not valid YAML.
    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A mandatory attribute is absent.
    #[error("No {field} found in: {}", path.display())]
    MissingField { field: &'static str, path: PathBuf },

    /// A mandatory attribute has the wrong type.
    #[error("{field} must be a String in: {}", path.display())]
    InvalidField { field: &'static str, path: PathBuf },

    /// A mandatory attribute is blank.
    #[error("{field} must not be blank in: {}", path.display())]
    BlankField { field: &'static str, path: PathBuf },
}
