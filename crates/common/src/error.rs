/// PromptDeck error types
#[derive(Debug, thiserror::Error)]
pub enum PromptDeckError {
    /// Upstream model returned an error or an unexpected payload
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error
    #[error("File system error: {0}")]
    FileSystem(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or rejected API key
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromptDeckError {
    /// Create LLM error
    pub fn llm<S: Into<String>>(msg: S) -> Self {
        Self::Llm(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create file system error
    pub fn file_system<S: Into<String>>(msg: S) -> Self {
        Self::FileSystem(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create unauthorized error
    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether a retry of the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

// HTTP response conversion
impl PromptDeckError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Llm(_) => 502,
            Self::FileSystem(_) => 500,
            Self::Network(_) => 503,
            Self::Serialization(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PromptDeckError::invalid_input("x").status_code(), 400);
        assert_eq!(PromptDeckError::unauthorized("x").status_code(), 401);
        assert_eq!(PromptDeckError::not_found("x").status_code(), 404);
        assert_eq!(PromptDeckError::llm("x").status_code(), 502);
        assert_eq!(PromptDeckError::network("x").status_code(), 503);
    }

    #[test]
    fn test_only_network_errors_are_transient() {
        assert!(PromptDeckError::network("timeout").is_transient());
        assert!(!PromptDeckError::unauthorized("bad key").is_transient());
        assert!(!PromptDeckError::llm("400 Bad Request").is_transient());
    }

    #[test]
    fn test_display_messages() {
        let err = PromptDeckError::not_found("Template 7");
        assert_eq!(err.to_string(), "Not found: Template 7");
    }
}
