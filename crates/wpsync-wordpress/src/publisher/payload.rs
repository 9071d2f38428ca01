//! Outgoing document payloads.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use wpsync_source::LocalDocument;

use super::PublishConfig;

/// UTC timestamp format of `date_gmt`.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format the batch publication date.
pub(crate) fn publish_date(now: DateTime<Utc>) -> String {
    now.format(DATE_FORMAT).to_string()
}

/// Fields every payload carries, before references are resolved.
pub(crate) fn base_payload(
    document: &LocalDocument,
    config: &PublishConfig,
    date: &str,
) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("date_gmt".to_owned(), Value::from(date));
    payload.insert("slug".to_owned(), Value::from(document.slug.as_str()));
    payload.insert("status".to_owned(), Value::from(config.status.as_str()));
    payload.insert("title".to_owned(), Value::from(document.title.as_str()));
    payload.insert("content".to_owned(), Value::from(document.content.as_str()));
    payload.insert(
        "type".to_owned(),
        Value::from(config.document_type.name()),
    );
    if !config.template.trim().is_empty() {
        payload.insert("template".to_owned(), Value::from(config.template.as_str()));
    }
    payload
}
