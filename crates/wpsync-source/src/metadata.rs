//! YAML attribute parsing for document metadata files.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::warn;

use crate::document::TaxonomyAssignment;
use crate::error::SourceError;

/// Attributes as they appear in the file, before type checks.
///
/// Fields are kept as raw values so each can be reported individually
/// instead of failing the whole file on the first type mismatch.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawAttributes {
    slug: Option<Value>,
    title: Option<Value>,
    tags: Option<Value>,
    taxonomies: Option<Value>,
    parent_path: Option<Value>,
}

/// Checked document attributes.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Attributes {
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub taxonomies: Vec<TaxonomyAssignment>,
    pub parent_path: Option<String>,
}

/// Parse document attributes from YAML content.
///
/// `path` is only used for error and warning messages.
pub(crate) fn parse_attributes(content: &str, path: &Path) -> Result<Attributes, SourceError> {
    let raw: RawAttributes = if content.trim().is_empty() {
        RawAttributes::default()
    } else {
        serde_yaml::from_str(content).map_err(|source| SourceError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    let slug = mandatory_string(raw.slug, "slug", path)?;
    let title = mandatory_string(raw.title, "title", path)?;

    Ok(Attributes {
        slug,
        title,
        tags: string_list(raw.tags),
        taxonomies: taxonomies(raw.taxonomies, path),
        parent_path: optional_string(raw.parent_path),
    })
}

fn mandatory_string(
    value: Option<Value>,
    field: &'static str,
    path: &Path,
) -> Result<String, SourceError> {
    let path = path.to_path_buf();
    match value {
        None | Some(Value::Null) => Err(SourceError::MissingField { field, path }),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(SourceError::BlankField { field, path })
        }
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(SourceError::InvalidField { field, path }),
    }
}

fn optional_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Keep the string items of a sequence, ignore everything else.
fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn taxonomies(value: Option<Value>, path: &Path) -> Vec<TaxonomyAssignment> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Sequence(items)) => items,
        Some(_) => {
            warn!(path = %path.display(), "taxonomies must be a list, ignoring");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| {
            let assignment = taxonomy_entry(&item);
            if assignment.is_none() {
                warn!(
                    path = %path.display(),
                    "Ignoring malformed taxonomy entry, expected {{key, values}}"
                );
            }
            assignment
        })
        .collect()
}

fn taxonomy_entry(item: &Value) -> Option<TaxonomyAssignment> {
    let key = item.get("key")?.as_str()?.trim();
    if key.is_empty() {
        return None;
    }
    let values = match item.get("values") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(values)) => values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        Some(_) => return None,
    };
    Some(TaxonomyAssignment {
        key: key.to_owned(),
        values,
    })
}
