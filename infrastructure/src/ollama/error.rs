//! Error types for the Ollama adapter

use std::path::PathBuf;
use thiserror::Error;
use visionlink_application::ProviderError;

/// Result type alias for Ollama operations
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Errors that can occur when talking to the Ollama server
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollama returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model '{0}' is not available on the server")]
    ModelNotFound(String),

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model '{0}' returned an empty response")]
    EmptyResponse(String),
}

impl From<OllamaError> for ProviderError {
    fn from(err: OllamaError) -> Self {
        match err {
            OllamaError::Http(e) if e.is_timeout() => ProviderError::Timeout,
            OllamaError::Http(e) if e.is_connect() => {
                ProviderError::Unavailable(format!("cannot reach Ollama: {}", e))
            }
            OllamaError::Http(e) if e.is_decode() => ProviderError::InvalidResponse(e.to_string()),
            OllamaError::Http(e) => ProviderError::RequestFailed(e.to_string()),
            OllamaError::Status { .. } => ProviderError::RequestFailed(err.to_string()),
            OllamaError::ModelNotFound(_) => ProviderError::Unavailable(err.to_string()),
            OllamaError::ImageRead { ref path, ref source }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ProviderError::InputNotFound(path.display().to_string())
            }
            OllamaError::ImageRead { .. } => ProviderError::Other(err.to_string()),
            OllamaError::EmptyResponse(_) => ProviderError::InvalidResponse(err.to_string()),
        }
    }
}
