use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Template catalog is invalid: {0}")]
    InvalidCatalog(String),
    #[error("Document {file_name} could not be read: {reason}")]
    UnreadableDocument { file_name: String, reason: String },
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Remote scoring request failed with status {status}: {body}")]
    RemoteScoring { status: u16, body: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CoreError {
    pub fn unreadable(file_name: &str, reason: impl Into<String>) -> Self {
        CoreError::UnreadableDocument {
            file_name: file_name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::RemoteScoring { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
