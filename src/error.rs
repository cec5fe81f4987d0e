use thiserror::Error;

/// Main error type for the cellar engine
#[derive(Error, Debug)]
pub enum CellarError {
    /// Caller supplied unusable input (e.g. a blank search guess)
    #[error("{0}")]
    InvalidInput(String),

    /// An external search or image source failed or timed out
    #[error("Source '{source_name}' unavailable: {message}")]
    UpstreamUnavailable { source_name: String, message: String },

    /// Wine record does not exist
    #[error("Wine not found: {0}")]
    NotFound(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl CellarError {
    pub fn upstream(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        CellarError::UpstreamUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<String> for CellarError {
    fn from(s: String) -> Self {
        CellarError::Other(s)
    }
}

impl From<&str> for CellarError {
    fn from(s: &str) -> Self {
        CellarError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CellarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display() {
        let err = CellarError::upstream("wikipedia-fr", "HTTP 503");
        assert_eq!(err.to_string(), "Source 'wikipedia-fr' unavailable: HTTP 503");
    }

    #[test]
    fn test_invalid_input_is_message_only() {
        let err = CellarError::InvalidInput("Enter a producer".to_string());
        assert_eq!(err.to_string(), "Enter a producer");
    }
}
