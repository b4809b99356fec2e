use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a menu load.
///
/// Row-level problems never show up here: the normalizer drops bad rows and
/// the load still succeeds with whatever is left.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load menu data from {source_label}: {message}")]
    Transport { source_label: String, message: String },

    #[error("Error parsing menu data: {message}")]
    Format { line: Option<u64>, message: String },

    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("No file provided")]
    NoFile,

    #[error("File must be a CSV (got {file_name})")]
    UnsupportedFile { file_name: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Load was superseded by a newer request")]
    Superseded,
}

impl LoadError {
    /// Message suitable for the status line shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Transport { .. } | LoadError::Io { .. } => {
                format!("Failed to load menu data. {}", self)
            }
            _ => self.to_string(),
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line());
        let message = match line {
            Some(line) => format!("line {}: {}", line, err),
            None => err.to_string(),
        };
        LoadError::Format { line, message }
    }
}
