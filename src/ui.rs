// UI layer: turns API results into terminal text. Renderers write to any
// `io::Write` so command output can be captured; the spinner and error
// line go to stderr so stdout only carries results.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::api::{ChatResponse, FileRecord, ModelInfo};

/// Upload confirmation followed by the service's reply as pretty JSON.
pub fn render_upload(out: &mut impl Write, response: &serde_json::Value) -> io::Result<()> {
    writeln!(out, "File uploaded successfully.")?;
    let pretty = serde_json::to_string_pretty(response).map_err(io::Error::other)?;
    writeln!(out, "{}", pretty)
}

pub fn render_knowledge(out: &mut impl Write, docs: &[FileRecord]) -> io::Result<()> {
    writeln!(out, "Knowledge documents:")?;
    for doc in docs {
        writeln!(out, "- ID: {}", doc.id)?;
        writeln!(out, "  Filename: {}", doc.filename.as_deref().unwrap_or("N/A"))?;
        writeln!(
            out,
            "  Collection: {}",
            doc.meta.collection_name.as_deref().unwrap_or("N/A")
        )?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn render_models(out: &mut impl Write, models: &[ModelInfo]) -> io::Result<()> {
    writeln!(out, "Available models:")?;
    for model in models {
        writeln!(out, "- {}", model.display_name())?;
    }
    Ok(())
}

/// Print every choice's content. Models sometimes return literal `\n`
/// escape sequences; those are turned into real newlines.
pub fn render_answer(out: &mut impl Write, response: &ChatResponse) -> io::Result<()> {
    writeln!(out, "Response:")?;
    for choice in &response.choices {
        let content = choice.message.content.as_deref().unwrap_or_default();
        writeln!(out, "{}", content.replace("\\n", "\n"))?;
        writeln!(out)?;
    }
    Ok(())
}

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Spinner shown on stderr while a request is in flight. indicatif hides
/// it when stderr is not a terminal.
pub struct Spinner(ProgressBar);

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Spinner(bar)
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}
