//! Document discovery by filesystem walking.
//!
//! Discovery is split in two phases, like the build that produced the
//! files: first find every `.html` artifact, then pair each one with its
//! `.yml` sibling and parse it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::LocalDocument;
use crate::error::SourceError;
use crate::metadata::parse_attributes;

/// Extension of built content files.
const CONTENT_EXTENSION: &str = "html";

/// Extension of the sibling metadata files.
const METADATA_EXTENSION: &str = "yml";

/// Discovers publishable documents under a set of source trees.
pub struct DocumentScanner {
    sources: Vec<PathBuf>,
}

impl DocumentScanner {
    /// Create a scanner over the given source trees.
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self { sources }
    }

    /// Find every content file, sorted by path.
    ///
    /// Missing source trees are skipped with a warning.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for source in &self.sources {
            if source.is_dir() {
                collect_content_files(source, &mut files);
            } else if !source.exists() {
                warn!(source = %source.display(), "Source does not exist, skipping");
            } else if is_content_file(source) {
                files.push(source.clone());
            } else {
                warn!(source = %source.display(), "Source is not an HTML file, skipping");
            }
        }
        files.sort();
        files.dedup();
        files
    }

    /// Load every valid document.
    ///
    /// Documents that fail to load are logged and left out.
    pub fn load(&self) -> Vec<LocalDocument> {
        self.scan()
            .into_iter()
            .filter_map(|path| match load_document(&path) {
                Ok(document) => Some(document),
                Err(err) => {
                    warn!("{err}, unable to publish {}", file_name(&path));
                    None
                }
            })
            .collect()
    }
}

/// Load all documents found under `sources`.
pub fn load_documents(sources: &[PathBuf]) -> Vec<LocalDocument> {
    DocumentScanner::new(sources.to_vec()).load()
}

/// Build a document from a content file and its metadata sibling.
pub(crate) fn load_document(content_path: &Path) -> Result<LocalDocument, SourceError> {
    let metadata_path = content_path.with_extension(METADATA_EXTENSION);
    if !metadata_path.is_file() {
        return Err(SourceError::MissingMetadata(metadata_path));
    }

    debug!(path = %metadata_path.display(), "Loading document attributes");
    let yaml = read(&metadata_path)?;
    let attributes = parse_attributes(&yaml, &metadata_path)?;
    let content = read(content_path)?;

    Ok(LocalDocument {
        slug: attributes.slug,
        title: attributes.title,
        tags: attributes.tags,
        taxonomies: attributes.taxonomies,
        content,
        parent_path: attributes.parent_path,
        source_path: content_path.to_path_buf(),
    })
}

fn read(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn collect_content_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        warn!(dir = %dir.display(), "Unable to read directory");
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            collect_content_files(&path, files);
        } else if is_content_file(&path) {
            files.push(path);
        }
    }
}

fn is_content_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CONTENT_EXTENSION)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;
    use crate::document::TaxonomyAssignment;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_scan_finds_html_recursively_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.html", "");
        write(dir.path(), "a.html", "");
        write(dir.path(), "nested/c.html", "");
        write(dir.path(), "a.yml", "");
        write(dir.path(), "style.css", "");
        write(dir.path(), ".hidden/d.html", "");

        let files = DocumentScanner::new(vec![dir.path().to_path_buf()]).scan();

        assert_eq!(
            files,
            vec![
                dir.path().join("a.html"),
                dir.path().join("b.html"),
                dir.path().join("nested/c.html"),
            ]
        );
    }

    #[test]
    fn test_scan_multiple_sources_and_missing_source() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "one.html", "");
        write(second.path(), "two.html", "");

        let files = DocumentScanner::new(vec![
            first.path().to_path_buf(),
            PathBuf::from("/nonexistent/wpsync"),
            second.path().to_path_buf(),
        ])
        .scan();

        assert_eq!(files.len(), 2);
    }

    #[test]
    #[traced_test]
    fn test_scan_single_file_sources() {
        let dir = tempfile::tempdir().unwrap();
        let html = write(dir.path(), "intro.html", "");
        let yaml = write(dir.path(), "intro.yml", "");

        let files = DocumentScanner::new(vec![
            html.clone(),
            yaml,
            dir.path().join("gone.html"),
        ])
        .scan();

        assert_eq!(files, vec![html]);
        assert!(logs_contain("Source is not an HTML file, skipping"));
        assert!(logs_contain("Source does not exist, skipping"));
    }

    #[test]
    fn test_load_document_pair() {
        let dir = tempfile::tempdir().unwrap();
        let html = write(dir.path(), "intro.html", "<p>Hello</p>");
        write(
            dir.path(),
            "intro.yml",
            "slug: intro\ntitle: Intro\ntaxonomies:\n  - key: topic\n    values: [graphs]\n",
        );

        let document = load_document(&html).unwrap();

        assert_eq!(document.slug, "intro");
        assert_eq!(document.title, "Intro");
        assert_eq!(document.content, "<p>Hello</p>");
        assert_eq!(
            document.taxonomies,
            vec![TaxonomyAssignment::new("topic", ["graphs"])]
        );
        assert_eq!(document.source_path, html);
    }

    #[test]
    fn test_load_document_missing_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let html = write(dir.path(), "orphan.html", "<p></p>");

        let err = load_document(&html).unwrap_err();

        assert!(matches!(err, SourceError::MissingMetadata(ref p) if p.ends_with("orphan.yml")));
    }

    #[test]
    #[traced_test]
    fn test_load_skips_invalid_documents() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.html", "<p>ok</p>");
        write(dir.path(), "good.yml", "slug: good\ntitle: Good");
        write(dir.path(), "no-title.html", "<p>bad</p>");
        write(dir.path(), "no-title.yml", "slug: no-title");
        write(dir.path(), "orphan.html", "<p>orphan</p>");

        let documents = load_documents(&[dir.path().to_path_buf()]);

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].slug, "good");
        assert!(logs_contain("No title found in"));
        assert!(logs_contain("unable to publish no-title.html"));
        assert!(logs_contain("Missing YAML file"));
    }
}
