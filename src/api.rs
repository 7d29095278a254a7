// API client module: a small blocking HTTP client for the Open WebUI REST
// API. One method per endpoint; every call is a single request.

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::error::{OwebError, Result};

/// Holds a reqwest blocking client with the bearer header preinstalled,
/// plus the resolved configuration for building endpoint URLs.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

/// A knowledge document as listed (or returned on upload) by the service.
/// Unknown fields are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub meta: FileMeta,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FileMeta {
    #[serde(default)]
    pub collection_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ModelInfo {
    /// The human name when the service provides one, the id otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Deserialize, Debug)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Chat completion payload. `knowledge_ids` is left out entirely when no
/// documents were requested.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_ids: Option<Vec<String>>,
}

impl ChatRequest {
    /// One-shot question. Document ids are passed through in the given order.
    pub fn question(question: impl Into<String>, model: impl Into<String>, knowledge_ids: Vec<String>) -> Self {
        ChatRequest {
            model: model.into(),
            messages: vec![ChatMessage::user(question)],
            knowledge_ids: if knowledge_ids.is_empty() {
                None
            } else {
                Some(knowledge_ids)
            },
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Choice {
    #[serde(default)]
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ApiClient {
    /// Build a client for the given configuration. The Authorization
    /// header is attached to every request.
    pub fn new(config: Config) -> Result<Self> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|_| OwebError::InvalidConfig("API key contains characters not allowed in a header".into()))?;
        bearer.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("oweb/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|source| OwebError::Transport {
                url: config.base_url().to_string(),
                source,
            })?;
        Ok(ApiClient { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Upload a document with multipart/form-data under the `file` field.
    /// The file is read before anything is sent, so a missing file never
    /// reaches the network.
    pub fn upload_file(&self, path: &Path) -> Result<serde_json::Value> {
        if !path.is_file() {
            return Err(OwebError::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| OwebError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();

        let url = self.config.endpoint("v1/files/");
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(path))
            .map_err(|source| OwebError::Transport {
                url: url.clone(),
                source,
            })?;
        let form = multipart::Form::new().part("file", part);

        debug!(method = "POST", %url, file = %path.display(), "uploading file");
        let res = self.send(&url, self.client.post(&url).multipart(form))?;
        decode(&url, res)
    }

    /// List the knowledge documents known to the service.
    pub fn list_files(&self) -> Result<Vec<FileRecord>> {
        let url = self.config.endpoint("v1/files/");
        debug!(method = "GET", %url, "listing files");
        let res = self.send(&url, self.client.get(&url))?;
        decode(&url, res)
    }

    /// List the models available for chat.
    pub fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.config.endpoint("models");
        debug!(method = "GET", %url, "listing models");
        let res = self.send(&url, self.client.get(&url))?;
        let list: ModelList = decode(&url, res)?;
        Ok(list.data)
    }

    /// Run a chat completion.
    pub fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let url = self.config.endpoint("chat/completions");
        debug!(
            method = "POST",
            %url,
            model = %req.model,
            knowledge = req.knowledge_ids.as_ref().map_or(0, Vec::len),
            "requesting chat completion"
        );
        let res = self.send(&url, self.client.post(&url).json(req))?;
        decode(&url, res)
    }

    /// Send the request and turn any non-success status into an error that
    /// carries the service's response body.
    fn send(&self, url: &str, req: RequestBuilder) -> Result<Response> {
        let res = req.send().map_err(|source| OwebError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = res.status();
        debug!(%status, %url, "response received");
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(OwebError::Service { status, body });
        }
        Ok(res)
    }
}

fn decode<T: DeserializeOwned>(url: &str, res: Response) -> Result<T> {
    let body = res.text().map_err(|source| OwebError::Transport {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|e| OwebError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Content type for the multipart part, from the file extension.
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("md" | "markdown") => "text/markdown",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        Some("html" | "htm") => "text/html",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}
