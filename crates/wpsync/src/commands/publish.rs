//! `wpsync publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;
use wpsync_config::{CliSettings, Config, PublishStatus};
use wpsync_source::load_documents;
use wpsync_wordpress::{
    DocumentOutcome, DocumentResult, DocumentType, PublishConfig, PublishReport, Publisher,
    WordPressClient,
};

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Path to configuration file (default: auto-discover wpsync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document type, e.g. "post" or "page" (overrides config).
    #[arg(short = 't', long = "type")]
    document_type: Option<String>,

    /// Status of published documents (overrides config).
    #[arg(short, long)]
    status: Option<PublishStatus>,

    /// Page template (overrides config).
    #[arg(long)]
    template: Option<String>,

    /// Directory holding built documents; repeat for several (overrides config).
    #[arg(long = "source")]
    sources: Vec<PathBuf>,

    /// WordPress host (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Resolve everything but create and update nothing.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output (show INFO logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, or if the
    /// document type, the connection settings or the sources are missing.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            debug!(path = %path.display(), "Loaded configuration");
        }

        // Checked before anything touches the network
        let document_type = DocumentType::new(config.require_document_type()?);
        let wordpress = config.require_wordpress()?;
        let publish = &config.publish_resolved;
        if publish.sources.is_empty() {
            return Err(CliError::Validation(
                "no sources to publish (set publish.sources or pass --source)".to_owned(),
            ));
        }

        let documents = load_documents(&publish.sources);
        output.info(&format!(
            "Publishing {} {} document(s) to {}...",
            documents.len(),
            document_type,
            wordpress.host
        ));

        let client = WordPressClient::from_config(wordpress);
        let publisher = Publisher::new(
            &client,
            PublishConfig {
                document_type,
                status: publish.status,
                template: publish.template.clone(),
                dry_run: self.dry_run,
            },
        );

        match publisher.publish_with_report(&documents) {
            Some(report) => print_report(&output, &report, self.dry_run),
            None => output.line(Tone::Warn, "No documents found, nothing to publish."),
        }

        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            document_type: self.document_type.clone(),
            status: self.status,
            template: self.template.clone(),
            sources: (!self.sources.is_empty()).then(|| self.sources.clone()),
            host: self.host.clone(),
        }
    }
}

fn print_report(output: &Output, report: &PublishReport, dry_run: bool) {
    if dry_run {
        output.line(Tone::Heading, "\n[DRY RUN] No changes made.");
    }
    for result in &report.documents {
        let (tone, line) = outcome_line(result);
        output.line(tone, &line);
    }

    let summary = format!(
        "\n{} created, {} updated, {} skipped, {} failed",
        report.created(),
        report.updated(),
        report.skipped(),
        report.failed()
    );
    let tone = if report.is_clean() {
        Tone::Good
    } else {
        Tone::Warn
    };
    output.line(tone, &summary);
}

fn outcome_line(result: &DocumentResult) -> (Tone, String) {
    let slug = &result.slug;
    match &result.outcome {
        DocumentOutcome::Created { id } => (Tone::Good, format!("  + {slug} (id {id})")),
        DocumentOutcome::Updated { id } => (Tone::Good, format!("  ~ {slug} (id {id})")),
        DocumentOutcome::WouldCreate => (Tone::Plain, format!("  + {slug} (new)")),
        DocumentOutcome::WouldUpdate { id } => (Tone::Plain, format!("  ~ {slug} (id {id})")),
        DocumentOutcome::Skipped { reason } => (Tone::Warn, format!("  - {slug}: {reason}")),
        DocumentOutcome::Failed { reason } => (Tone::Bad, format!("  ! {slug}: {reason}")),
    }
}
