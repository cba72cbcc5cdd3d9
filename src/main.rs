// Entrypoint for the CLI application.
// - Logging goes to stderr, controlled by `RUST_LOG` (default `warn`).
// - Every failure is reported on stdout and turns into exit status 1.

use std::process::ExitCode;

use recipe_import::{config::ImportConfig, ui};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    let mut reporter = ui::Reporter::stdout();
    match ui::run(std::env::args(), &ImportConfig::default(), &mut reporter) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            reporter.failure(&err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
