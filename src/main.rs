// Entrypoint: load `.env`, parse arguments, run one command and map the
// outcome to an exit code.

use std::process::ExitCode;

use clap::Parser;
use oweb_cli::cli::Cli;
use oweb_cli::commands::execute_command;
use oweb_cli::{exitcode, logging, ui};

fn main() -> ExitCode {
    // Before parsing, so clap's env fallbacks see values from `.env`.
    // Variables already set in the environment win.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }

    match execute_command(&cli) {
        Ok(()) => ExitCode::from(exitcode::OK),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            ui::error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}
