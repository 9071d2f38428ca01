//! Configuration management for wpsync.
//!
//! Parses `wpsync.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `wordpress.scheme`
//! - `wordpress.host`
//! - `wordpress.username`
//! - `wordpress.password`

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override document type (e.g. "post", "page").
    pub document_type: Option<String>,
    /// Override publish status.
    pub status: Option<PublishStatus>,
    /// Override page template.
    pub template: Option<String>,
    /// Override source trees to scan.
    pub sources: Option<Vec<PathBuf>>,
    /// Override `WordPress` host.
    pub host: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wpsync.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `WordPress` connection settings.
    pub wordpress: WordPressConfig,
    /// Publish settings (paths are relative strings from TOML).
    publish: PublishConfigRaw,

    /// Resolved publish configuration (set after loading).
    #[serde(skip)]
    pub publish_resolved: PublishConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `WordPress` connection settings, constant for a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WordPressConfig {
    /// URL scheme ("http" or "https").
    pub scheme: String,
    /// Host name, optionally with port.
    pub host: String,
    /// Basic auth user name.
    pub username: String,
    /// Basic auth password (usually an application password).
    pub password: String,
    /// Connect timeout in seconds.
    pub connect_timeout: u64,
    /// Write timeout in seconds.
    pub write_timeout: u64,
    /// Read timeout in seconds.
    pub read_timeout: u64,
    /// Number of responses in an auth challenge chain after which the
    /// client stops re-sending credentials.
    pub auth_retry_limit: u32,
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_owned(),
            host: String::new(),
            username: String::new(),
            password: String::new(),
            connect_timeout: 10,
            write_timeout: 10,
            read_timeout: 30,
            auth_retry_limit: 3,
        }
    }
}

impl WordPressConfig {
    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Write timeout as a [`Duration`].
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout)
    }

    /// Read timeout as a [`Duration`].
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    /// Validate that all required connection fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_structure()?;
        require_non_empty(&self.host, "wordpress.host")?;
        require_non_empty(&self.username, "wordpress.username")?;
        Ok(())
    }

    /// Checks that hold even before credentials are filled in.
    fn validate_structure(&self) -> Result<(), ConfigError> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConfigError::Validation(format!(
                "wordpress.scheme must be http or https, got {:?}",
                self.scheme
            )));
        }
        if self.auth_retry_limit == 0 {
            return Err(ConfigError::Validation(
                "wordpress.auth_retry_limit must be at least 1".to_owned(),
            ));
        }
        for (value, field) in [
            (self.connect_timeout, "wordpress.connect_timeout"),
            (self.write_timeout, "wordpress.write_timeout"),
            (self.read_timeout, "wordpress.read_timeout"),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "{field} must be greater than 0"
                )));
            }
        }
        Ok(())
    }
}

/// Status assigned to every document published in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Publish,
    Future,
    #[default]
    Draft,
    Pending,
    Private,
}

impl PublishStatus {
    /// Every status, in the order `WordPress` documents them.
    pub const ALL: [Self; 5] = [
        Self::Publish,
        Self::Future,
        Self::Draft,
        Self::Pending,
        Self::Private,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Future => "future",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublishStatus {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "status must be one of publish, future, draft, pending, private; got {s:?}"
                ))
            })
    }
}

/// Raw publish configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PublishConfigRaw {
    #[serde(rename = "type")]
    document_type: Option<String>,
    status: Option<PublishStatus>,
    template: Option<String>,
    sources: Option<Vec<String>>,
}

/// Resolved publish configuration with absolute source paths.
#[derive(Debug, Default)]
pub struct PublishConfig {
    /// Document type name. Mandatory, checked by [`Config::require_document_type`].
    pub document_type: Option<String>,
    /// Status for every published document.
    pub status: PublishStatus,
    /// Page template, empty for the theme default.
    pub template: String,
    /// Source trees to scan for built documents.
    pub sources: Vec<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`wordpress.password`").
        field: String,
        /// Error message (e.g., "${`WORDPRESS_PASSWORD`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wpsync.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(document_type) = &settings.document_type {
            self.publish_resolved.document_type = Some(document_type.clone());
        }
        if let Some(status) = settings.status {
            self.publish_resolved.status = status;
        }
        if let Some(template) = &settings.template {
            self.publish_resolved.template.clone_from(template);
        }
        if let Some(sources) = &settings.sources {
            self.publish_resolved.sources.clone_from(sources);
        }
        if let Some(host) = &settings.host {
            self.wordpress.host.clone_from(host);
        }
    }

    /// Get the mandatory document type.
    ///
    /// Nothing may touch the network before this succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the type is missing or blank.
    pub fn require_document_type(&self) -> Result<&str, ConfigError> {
        match self.publish_resolved.document_type.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name.trim()),
            _ => Err(ConfigError::Validation(
                "publish.type is mandatory (set it in [publish] or pass --type)".into(),
            )),
        }
    }

    /// Get validated `WordPress` connection settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the host or username is missing.
    pub fn require_wordpress(&self) -> Result<&WordPressConfig, ConfigError> {
        self.wordpress.validate()?;
        Ok(&self.wordpress)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Credentials are not checked here; see [`Config::require_wordpress`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wordpress.validate_structure()
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let wp = &mut self.wordpress;
        wp.scheme = expand::expand_env(&wp.scheme, "wordpress.scheme")?;
        wp.host = expand::expand_env(&wp.host, "wordpress.host")?;
        wp.username = expand::expand_env(&wp.username, "wordpress.username")?;
        wp.password = expand::expand_env(&wp.password, "wordpress.password")?;
        Ok(())
    }

    /// Resolve source trees relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.publish_resolved = PublishConfig {
            document_type: self.publish.document_type.clone(),
            status: self.publish.status.unwrap_or_default(),
            template: self.publish.template.clone().unwrap_or_default(),
            sources: self
                .publish
                .sources
                .iter()
                .flatten()
                .map(|s| config_dir.join(s))
                .collect(),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.wordpress.scheme, "https");
        assert_eq!(config.wordpress.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.wordpress.write_timeout(), Duration::from_secs(10));
        assert_eq!(config.wordpress.read_timeout(), Duration::from_secs(30));
        assert_eq!(config.wordpress.auth_retry_limit, 3);
        assert_eq!(config.publish_resolved.status, PublishStatus::Draft);
        assert!(config.publish_resolved.document_type.is_none());
        assert!(config.publish_resolved.sources.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.wordpress.scheme, "https");
        assert!(config.wordpress.host.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[wordpress]
scheme = "http"
host = "localhost:8080"
username = "admin"
password = "secret"
read_timeout = 60
auth_retry_limit = 5

[publish]
type = "page"
status = "publish"
template = "page-docs.php"
sources = ["build/html", "build/extra"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.wordpress.scheme, "http");
        assert_eq!(config.wordpress.host, "localhost:8080");
        assert_eq!(config.wordpress.read_timeout(), Duration::from_secs(60));
        assert_eq!(config.wordpress.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.wordpress.auth_retry_limit, 5);
        assert_eq!(config.publish_resolved.document_type.as_deref(), Some("page"));
        assert_eq!(config.publish_resolved.status, PublishStatus::Publish);
        assert_eq!(config.publish_resolved.template, "page-docs.php");
        assert_eq!(
            config.publish_resolved.sources,
            vec![
                PathBuf::from("/project/build/html"),
                PathBuf::from("/project/build/extra")
            ]
        );
    }

    #[test]
    fn test_parse_invalid_status_fails() {
        let toml = r#"
[publish]
status = "archived"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_from_str() {
        for status in PublishStatus::ALL {
            assert_eq!(status.as_str().parse::<PublishStatus>().unwrap(), status);
        }
        let err = "trash".parse::<PublishStatus>().unwrap_err();
        assert!(err.to_string().contains("trash"));
    }

    #[test]
    fn test_require_document_type_missing() {
        let config = Config::default();
        let err = config.require_document_type().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("mandatory"));
    }

    #[test]
    fn test_require_document_type_blank() {
        let mut config = Config::default();
        config.publish_resolved.document_type = Some("   ".to_owned());
        assert!(config.require_document_type().is_err());
    }

    #[test]
    fn test_require_document_type_present() {
        let mut config = Config::default();
        config.publish_resolved.document_type = Some("post".to_owned());
        assert_eq!(config.require_document_type().unwrap(), "post");
    }

    #[test]
    fn test_apply_cli_settings_overrides_publish() {
        let mut config = Config::default();
        let overrides = CliSettings {
            document_type: Some("page".to_owned()),
            status: Some(PublishStatus::Private),
            template: Some("wide.php".to_owned()),
            sources: Some(vec![PathBuf::from("/out")]),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.publish_resolved.document_type.as_deref(), Some("page"));
        assert_eq!(config.publish_resolved.status, PublishStatus::Private);
        assert_eq!(config.publish_resolved.template, "wide.php");
        assert_eq!(config.publish_resolved.sources, vec![PathBuf::from("/out")]);
        assert_eq!(config.wordpress.scheme, "https"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_host() {
        let mut config = Config::default();
        let overrides = CliSettings {
            host: Some("blog.example.com".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.wordpress.host, "blog.example.com");
        assert!(config.publish_resolved.document_type.is_none()); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.publish_resolved.status, PublishStatus::Draft);
        assert!(config.publish_resolved.template.is_empty());
    }

    #[test]
    fn test_expand_env_vars_wordpress() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_WP_HOST", "neo4j.example.com");
            std::env::set_var("TEST_WP_USER", "publisher");
            std::env::set_var("TEST_WP_PASSWORD", "app-password");
        }

        let toml = r#"
[wordpress]
host = "${TEST_WP_HOST}"
username = "${TEST_WP_USER}"
password = "${TEST_WP_PASSWORD}"
scheme = "${TEST_WP_SCHEME:-https}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.wordpress.host, "neo4j.example.com");
        assert_eq!(config.wordpress.username, "publisher");
        assert_eq!(config.wordpress.password, "app-password");
        assert_eq!(config.wordpress.scheme, "https");

        unsafe {
            std::env::remove_var("TEST_WP_HOST");
            std::env::remove_var("TEST_WP_USER");
            std::env::remove_var("TEST_WP_PASSWORD");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_WP_PASSWORD_TEST");
        }

        let toml = r#"
[wordpress]
password = "${MISSING_WP_PASSWORD_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_WP_PASSWORD_TEST"));
        assert!(err.to_string().contains("wordpress.password"));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wpsync.toml");
        std::fs::write(
            &path,
            r#"
[wordpress]
host = "example.com"
username = "bot"

[publish]
type = "post"
sources = ["html"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.require_document_type().unwrap(), "post");
        assert_eq!(config.publish_resolved.sources, vec![dir.path().join("html")]);
        assert!(config.require_wordpress().is_ok());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/wpsync.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &WordPressConfig, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    fn valid_wordpress_config() -> WordPressConfig {
        WordPressConfig {
            host: "example.com".to_owned(),
            username: "bot".to_owned(),
            password: "secret".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wordpress_validate_valid() {
        assert!(valid_wordpress_config().validate().is_ok());
    }

    #[test]
    fn test_wordpress_validate_empty_host() {
        let config = WordPressConfig {
            host: String::new(),
            ..valid_wordpress_config()
        };
        assert_validation_error(&config, &["wordpress.host", "empty"]);
    }

    #[test]
    fn test_wordpress_validate_empty_username() {
        let config = WordPressConfig {
            username: " ".to_owned(),
            ..valid_wordpress_config()
        };
        assert_validation_error(&config, &["wordpress.username"]);
    }

    #[test]
    fn test_wordpress_validate_bad_scheme() {
        let config = WordPressConfig {
            scheme: "ftp".to_owned(),
            ..valid_wordpress_config()
        };
        assert_validation_error(&config, &["scheme", "http"]);
    }

    #[test]
    fn test_wordpress_validate_zero_retry_limit() {
        let config = WordPressConfig {
            auth_retry_limit: 0,
            ..valid_wordpress_config()
        };
        assert_validation_error(&config, &["auth_retry_limit"]);
    }

    #[test]
    fn test_wordpress_validate_zero_timeout() {
        let config = WordPressConfig {
            read_timeout: 0,
            ..valid_wordpress_config()
        };
        assert_validation_error(&config, &["read_timeout"]);
    }

    #[test]
    fn test_require_wordpress_missing_host() {
        let config = Config::default();
        let err = config.require_wordpress().unwrap_err();
        assert!(err.to_string().contains("wordpress.host"));
    }
}
