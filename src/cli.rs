//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::{Overrides, API_KEY_ENV, BASE_URL_ENV, CONFIG_ENV, TIMEOUT_ENV};

#[derive(Parser, Debug)]
#[command(name = "oweb", version, about = "Open WebUI CLI tool", long_about = None)]
pub struct Cli {
    /// API key sent as a bearer token
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Open WebUI API [default: http://localhost:3000/api]
    #[arg(long, global = true, env = BASE_URL_ENV, value_hint = ValueHint::Url)]
    pub base_url: Option<String>,

    /// TOML config file [default: <config dir>/oweb/config.toml]
    #[arg(long, global = true, env = CONFIG_ENV, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = TIMEOUT_ENV)]
    pub timeout: Option<u64>,

    /// Log verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Upload a knowledge document
    Upload {
        /// Path to the document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Load all .md files from a directory and its subdirectories
    LoadDir {
        /// Path to the directory
        #[arg(value_hint = ValueHint::DirPath)]
        directory: PathBuf,
    },

    /// List all loaded knowledge documents
    ListKnowledge,

    /// List all available LLM models
    ListModels,

    /// Ask a one-shot question
    Ask {
        /// The question to ask
        question: String,

        /// Model name to use
        #[arg(long)]
        model: String,

        /// Knowledge document IDs to use as context
        #[arg(long, num_args = 0..)]
        knowledge: Vec<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_collects_knowledge_ids_in_order() {
        let cli = Cli::try_parse_from([
            "oweb", "ask", "What is RAG?", "--model", "llama3", "--knowledge", "k2", "k1", "k3",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Ask {
                question: "What is RAG?".into(),
                model: "llama3".into(),
                knowledge: vec!["k2".into(), "k1".into(), "k3".into()],
            }
        );
    }

    #[test]
    fn ask_accepts_bare_knowledge_flag() {
        let cli = Cli::try_parse_from(["oweb", "ask", "hi", "--model", "m", "--knowledge"]).unwrap();
        assert!(matches!(cli.command, Commands::Ask { ref knowledge, .. } if knowledge.is_empty()));
    }

    #[test]
    fn ask_requires_model() {
        let err = Cli::try_parse_from(["oweb", "ask", "hi"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["oweb", "list-models", "--base-url", "http://h/api", "-vv"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://h/api"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Commands::ListModels);
    }
}
