// UI layer: reads the command line, drives the import and prints what
// happened. Output goes through `Reporter` so tests can capture it.

use std::fmt::Display;
use std::io::{self, IsTerminal, Stdout, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::style::{style, Color, Stylize};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::info;

use crate::api::{ApiClient, ImportResponse};
use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::records;

/// How many per-recipe errors are listed; the count always covers all.
pub const MAX_LISTED_ERRORS: usize = 5;

/// Pull the CSV path out of `argv`. The program name is skipped and
/// anything after the path is ignored.
pub fn parse_args<I>(args: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(ImportError::Usage)
}

/// Parse arguments, then load, upload and report. Errors are returned
/// unprinted; hand them to `Reporter::failure`.
pub fn run<I, W>(args: I, config: &ImportConfig, reporter: &mut Reporter<W>) -> Result<ImportResponse>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    let csv_path = parse_args(args)?;
    import(&csv_path, config, reporter)
}

/// The import pipeline for an already chosen CSV file.
pub fn import<W: Write>(
    csv_path: &Path,
    config: &ImportConfig,
    reporter: &mut Reporter<W>,
) -> Result<ImportResponse> {
    reporter.line(format_args!("Reading CSV file: {}", csv_path.display()))?;
    let recipes = records::load_recipes(csv_path)?;
    reporter.line(format_args!("Found {} recipes", recipes.len()))?;

    let api = ApiClient::new(config)?;
    reporter.line(format_args!("Uploading to {}...", api.endpoint()))?;

    let spinner = reporter.spinner("Uploading...");
    let outcome = api.import_recipes(&recipes);
    spinner.finish_and_clear();
    let response = outcome?;
    info!(imported = ?response.imported, skipped = ?response.skipped, "import finished");

    reporter.summary(&response)?;
    reporter.viewer(&config.viewer_url)?;
    Ok(response)
}

/// Console writer for the import report. Colours and the spinner are only
/// used when `styled` is set.
pub struct Reporter<W> {
    out: W,
    styled: bool,
}

impl Reporter<Stdout> {
    /// Report to stdout, styled when stdout is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let styled = out.is_terminal();
        Reporter { out, styled }
    }
}

impl<W: Write> Reporter<W> {
    /// Unstyled reporter over any writer.
    pub fn plain(out: W) -> Self {
        Reporter { out, styled: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.styled {
            style(text).with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn spinner(&self, msg: &str) -> ProgressBar {
        if !self.styled {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Counts and the first few per-recipe errors from a 2xx response.
    pub fn summary(&mut self, response: &ImportResponse) -> io::Result<()> {
        let heading = self.paint("✅ Success!", Color::Green);
        writeln!(self.out)?;
        writeln!(self.out, "{heading}")?;
        writeln!(self.out, "   Imported: {} recipes", show(response.imported.as_ref()))?;
        writeln!(self.out, "   Skipped: {} recipes", show(response.skipped.as_ref()))?;

        let Some(errors) = response.errors.as_deref().filter(|e| !e.is_empty()) else {
            return Ok(());
        };
        writeln!(self.out, "   Errors: {}", errors.len())?;
        for err in errors.iter().take(MAX_LISTED_ERRORS) {
            writeln!(
                self.out,
                "      - {}: {}",
                show(err.recipe.as_ref()),
                show(err.error.as_ref())
            )?;
        }
        Ok(())
    }

    pub fn viewer(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "View your recipes at: {url}")
    }

    /// Print a terminal error. HTTP failures show the status code and then
    /// the raw body on its own line.
    pub fn failure(&mut self, err: &ImportError) -> io::Result<()> {
        if let ImportError::Usage = err {
            return writeln!(self.out, "{err}");
        }
        let heading = self.paint(&format!("❌ Error: {err}"), Color::Red);
        writeln!(self.out)?;
        writeln!(self.out, "{heading}")?;
        if let ImportError::Http { body, .. } = err {
            writeln!(self.out, "{body}")?;
        }
        Ok(())
    }
}

/// Render a reported value: strings bare, other JSON as written, and a
/// missing or null value as `None`.
fn show(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
