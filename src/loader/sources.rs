use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

use crate::error::LoadError;
use crate::loader::MenuSource;
use crate::utils::http::{fetch_with_retry, RetryPolicy};

const CSV_MIME_TYPE: &str = "text/csv";

fn decode_utf8(label: &str, bytes: Vec<u8>) -> Result<String, LoadError> {
    String::from_utf8(bytes).map_err(|err| LoadError::Format {
        line: None,
        message: format!("{} is not valid UTF-8: {}", label, err),
    })
}

/// Menu file on the local disk.
pub struct FileSource {
    path: PathBuf,
    label: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MenuSource for FileSource {
    async fn fetch_text(&self) -> Result<String, LoadError> {
        info!("Reading menu data from {}", self.label);
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        decode_utf8(&self.label, bytes)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Menu file served over HTTP(S).
pub struct UrlSource {
    url: Url,
    label: String,
    client: Client,
    retry: RetryPolicy,
}

impl UrlSource {
    pub fn new(url: Url, client: Client, retry: RetryPolicy) -> Self {
        let label = url.to_string();
        Self {
            url,
            label,
            client,
            retry,
        }
    }
}

#[async_trait]
impl MenuSource for UrlSource {
    async fn fetch_text(&self) -> Result<String, LoadError> {
        info!("Fetching menu data from {}", self.label);
        let transport = |err: anyhow::Error| LoadError::Transport {
            source_label: self.label.clone(),
            message: format!("{:#}", err),
        };

        let response = fetch_with_retry(&self.client, self.url.as_str(), self.retry)
            .await
            .map_err(transport)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| transport(err.into()))?;
        decode_utf8(&self.label, bytes.to_vec())
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// A file handed over by the user, e.g. through an upload form.
#[derive(Debug, Clone)]
pub struct UploadSource {
    file_name: String,
    mime_type: Option<String>,
    contents: Vec<u8>,
}

impl UploadSource {
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            contents,
        }
    }
}

#[async_trait]
impl MenuSource for UploadSource {
    async fn fetch_text(&self) -> Result<String, LoadError> {
        self.validate()?;
        decode_utf8(&self.file_name, self.contents.clone())
    }

    /// Only CSV uploads are accepted: by MIME type or by `.csv` file name.
    fn validate(&self) -> Result<(), LoadError> {
        let name = self.file_name.trim();
        let mime = self
            .mime_type
            .as_deref()
            .map(|m| m.split(';').next().unwrap_or_default().trim().to_lowercase());

        if name.is_empty() && mime.is_none() {
            return Err(LoadError::NoFile);
        }

        let csv_mime = mime.as_deref() == Some(CSV_MIME_TYPE);
        let csv_name = name.to_lowercase().ends_with(".csv");
        if csv_mime || csv_name {
            Ok(())
        } else {
            Err(LoadError::UnsupportedFile {
                file_name: self.file_name.clone(),
            })
        }
    }

    fn label(&self) -> &str {
        &self.file_name
    }
}
