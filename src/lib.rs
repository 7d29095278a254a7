// Library root
// ------------
// The binary (`main.rs`) is a thin shell around these modules:
// - `cli`: clap argument definitions.
// - `config`: API key / base URL resolution from flags, env and file.
// - `api`: blocking HTTP client for the Open WebUI REST API.
// - `commands`: maps each subcommand onto one API call.
// - `ui`: renders results and the in-flight spinner.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exitcode;
pub mod logging;
pub mod ui;

pub use error::{OwebError, Result};
