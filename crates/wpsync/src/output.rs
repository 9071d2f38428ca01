//! Colored terminal output on stderr.

use console::{Style, Term};

/// How a line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Good,
    Warn,
    Bad,
    Heading,
}

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Print one line in the given tone.
    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let styled = match tone {
            Tone::Plain => return self.write(msg),
            Tone::Good => Style::new().green().apply_to(msg),
            Tone::Warn => Style::new().yellow().apply_to(msg),
            Tone::Bad => Style::new().red().apply_to(msg),
            Tone::Heading => Style::new().cyan().bold().apply_to(msg),
        };
        self.write(&styled.to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Bad, msg);
    }

    fn write(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }
}
