use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed service returned HTTP {status}: {body}")]
    FeedApi { status: u16, body: String },

    #[error("Model API error: {0}")]
    ModelApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Errors raised while talking to the feed service.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Http(_) | AppError::FeedApi { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::FeedApi { status, .. } => Some(*status),
            AppError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
