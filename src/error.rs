use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodesError>;

#[derive(Error, Debug)]
pub enum CodesError {
    #[error("Malformed commit {sha} in repository {repo}: {reason}")]
    MalformedInput {
        repo: String,
        sha: String,
        reason: String,
    },
    #[error("Cannot assemble a dataset without any series")]
    EmptyDataset,
    #[error("HTTP error for {url}: {reason}")]
    Http { url: String, reason: String },
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl CodesError {
    /// Attach the owning repository to a record-level failure.
    pub fn in_repo(self, slug: &str) -> Self {
        match self {
            CodesError::MalformedInput { sha, reason, .. } => CodesError::MalformedInput {
                repo: slug.to_string(),
                sha,
                reason,
            },
            other => other,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, CodesError::MalformedInput { .. })
    }
}
