//! Command dispatch: one function per subcommand, each mapping its
//! arguments onto an `ApiClient` call and rendering the result.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::api::{ApiClient, ChatRequest};
use crate::cli::{Cli, Commands};
use crate::config::{Config, FileConfig};
use crate::error::{OwebError, Result};
use crate::ui::{self, Spinner};

/// Resolve configuration, build the client and run the requested command,
/// printing results to stdout.
///
/// Configuration is fully resolved before the client exists, so a missing
/// key never results in a request.
pub fn execute_command(cli: &Cli) -> Result<()> {
    let file = FileConfig::discover(cli.config.as_deref())?;
    let config = Config::resolve(cli.overrides(), file)?;
    debug!(?config, "configuration resolved");
    let client = ApiClient::new(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(&client, &cli.command, &mut out)
}

pub fn dispatch(client: &ApiClient, command: &Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Upload { file } => upload(client, file, out),
        Commands::LoadDir { directory } => load_dir(client, directory, out),
        Commands::ListKnowledge => list_knowledge(client, out),
        Commands::ListModels => list_models(client, out),
        Commands::Ask {
            question,
            model,
            knowledge,
        } => ask(client, question, model, knowledge, out),
    }
}

#[instrument(level = "debug", skip(client, out))]
pub fn upload(client: &ApiClient, file: &Path, out: &mut impl Write) -> Result<()> {
    let response = {
        let _spinner = Spinner::start(format!("Uploading {}...", file.display()));
        client.upload_file(file)?
    };
    ui::render_upload(out, &response).map_err(stdout_error)
}

/// Upload every markdown file under `directory`. All files are attempted;
/// the command fails afterwards if any upload did.
#[instrument(level = "debug", skip(client, out))]
pub fn load_dir(client: &ApiClient, directory: &Path, out: &mut impl Write) -> Result<()> {
    if !directory.is_dir() {
        return Err(OwebError::NotADirectory(directory.to_path_buf()));
    }

    let files = collect_markdown_files(directory)?;
    if files.is_empty() {
        writeln!(out, "No .md files found in {}", directory.display()).map_err(stdout_error)?;
        return Ok(());
    }

    writeln!(out, "Found {} .md files. Uploading...", files.len()).map_err(stdout_error)?;
    let mut failed = 0;
    for path in &files {
        info!(file = %path.display(), "uploading");
        writeln!(out, "Uploading: {}", path.display()).map_err(stdout_error)?;
        match client.upload_file(path) {
            Ok(response) => ui::render_upload(out, &response).map_err(stdout_error)?,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "upload failed");
                writeln!(out, "Failed to upload {}: {}", path.display(), e).map_err(stdout_error)?;
                failed += 1;
            }
        }
    }

    writeln!(out, "Uploaded {} of {} files.", files.len() - failed, files.len()).map_err(stdout_error)?;
    if failed > 0 {
        return Err(OwebError::PartialUpload {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

pub fn list_knowledge(client: &ApiClient, out: &mut impl Write) -> Result<()> {
    let docs = {
        let _spinner = Spinner::start("Fetching knowledge documents...");
        client.list_files()?
    };
    ui::render_knowledge(out, &docs).map_err(stdout_error)
}

pub fn list_models(client: &ApiClient, out: &mut impl Write) -> Result<()> {
    let models = {
        let _spinner = Spinner::start("Fetching models...");
        client.list_models()?
    };
    ui::render_models(out, &models).map_err(stdout_error)
}

#[instrument(level = "debug", skip(client, question, out))]
pub fn ask(
    client: &ApiClient,
    question: &str,
    model: &str,
    knowledge: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let request = ChatRequest::question(question, model, knowledge.to_vec());
    let response = {
        let _spinner = Spinner::start(format!("Asking {}...", model));
        client.chat(&request)?
    };
    ui::render_answer(out, &response).map_err(stdout_error)
}

/// Files under `root` whose name ends in `.md` (any case), recursively,
/// in file-name order.
pub fn collect_markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| OwebError::Io {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".md") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn stdout_error(source: io::Error) -> OwebError {
    OwebError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn collects_markdown_recursively_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("a.md"), "# a").unwrap();
        fs::write(root.join("notes.txt"), "skip").unwrap();
        fs::write(root.join("nested/B.MD"), "# b").unwrap();
        fs::write(root.join("nested/deeper/c.md"), "# c").unwrap();
        fs::write(root.join("nested/deeper/c.md.bak"), "skip").unwrap();

        let files = collect_markdown_files(root).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.md"),
                PathBuf::from("nested/B.MD"),
                PathBuf::from("nested/deeper/c.md"),
            ]
        );
    }

    #[test]
    fn empty_directory_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_markdown_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn load_dir_rejects_non_directory() {
        let client = ApiClient::new(Config::new("k", "http://127.0.0.1:9")).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut out = Vec::new();
        let err = load_dir(&client, file.path(), &mut out).unwrap_err();
        assert!(matches!(err, OwebError::NotADirectory(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn load_dir_without_markdown_succeeds_quietly() {
        let client = ApiClient::new(Config::new("k", "http://127.0.0.1:9")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "x").unwrap();
        let mut out = Vec::new();
        load_dir(&client, dir.path(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("No .md files found in "));
    }
}
