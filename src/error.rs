//! Error taxonomy for the client.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::exitcode;

/// Everything that can abort a command.
#[derive(Error, Debug)]
pub enum OwebError {
    #[error("{0} not configured (use --{1}, the {2} environment variable or the config file)")]
    MissingConfig(&'static str, &'static str, &'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("service returned {status}: {body}")]
    Service { status: StatusCode, body: String },

    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("{failed} of {total} uploads failed")]
    PartialUpload { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, OwebError>;

impl OwebError {
    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            OwebError::MissingConfig(..)
            | OwebError::InvalidConfig(_)
            | OwebError::ConfigNotFound(_)
            | OwebError::ConfigParse { .. } => exitcode::CONFIG,
            OwebError::FileNotFound(_) | OwebError::NotADirectory(_) => exitcode::NOINPUT,
            OwebError::Io { .. } => exitcode::IOERR,
            OwebError::Transport { .. } => exitcode::UNAVAILABLE,
            OwebError::Service { .. } | OwebError::PartialUpload { .. } => exitcode::PROTOCOL,
            OwebError::Decode { .. } => exitcode::DATAERR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_carries_body_verbatim() {
        let err = OwebError::Service {
            status: StatusCode::BAD_REQUEST,
            body: "{\"detail\":\"Model not found\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "service returned 400 Bad Request: {\"detail\":\"Model not found\"}"
        );
        assert_eq!(err.exit_code(), exitcode::PROTOCOL);
    }

    #[test]
    fn config_errors_map_to_config_exit_code() {
        let err = OwebError::MissingConfig("API key", "api-key", "OPEN_WEBUI_API_KEY");
        assert_eq!(err.exit_code(), exitcode::CONFIG);
        assert!(err.to_string().contains("OPEN_WEBUI_API_KEY"));
    }

    #[test]
    fn missing_input_maps_to_noinput() {
        let err = OwebError::FileNotFound(PathBuf::from("nope.md"));
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
        assert_eq!(err.to_string(), "file not found: nope.md");
    }
}
