//! REST URL construction.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped inside a query name or value.
///
/// Commas are left alone: `slug=a,b,c` is how the API takes lists.
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Immutable-style builder for API URLs.
///
/// ```
/// use wpsync_wordpress::ApiUrl;
///
/// let url = ApiUrl::new("https://example.com/wp-json/wp/v2")
///     .segment("posts")
///     .query("slug", "intro,setup");
/// assert_eq!(
///     url.to_string(),
///     "https://example.com/wp-json/wp/v2/posts?slug=intro,setup"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl {
    base: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ApiUrl {
    /// Start from a base URL (trailing slashes are dropped).
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_owned(),
            segments: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Append a path segment.
    #[must_use]
    pub fn segment(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.query.push((name.to_owned(), value.to_string()));
        self
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        for segment in &self.segments {
            write!(f, "/{}", utf8_percent_encode(segment, SEGMENT_ENCODE_SET))?;
        }
        for (i, (name, value)) in self.query.iter().enumerate() {
            write!(
                f,
                "{}{}={}",
                if i == 0 { '?' } else { '&' },
                utf8_percent_encode(name, QUERY_ENCODE_SET),
                utf8_percent_encode(value, QUERY_ENCODE_SET)
            )?;
        }
        Ok(())
    }
}
