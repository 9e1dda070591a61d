/// Error types for document translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Provider is missing configuration or rejected our credentials
    ConfigError(String),
    /// Locale code is empty or malformed
    InvalidLocale(String),
    /// Input is not valid JSON or its root is not an object
    InputFormatError(String),
    /// Transport-level failure talking to the provider
    NetworkError(String),
    /// Provider answered, but not with a usable translation
    TranslationError(String),
    /// Placeholder tokens were lost or duplicated by the provider
    PlaceholderError(String),
    /// General error with context
    Other(String),
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            MtError::InputFormatError(msg) => write!(f, "Invalid input: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
            MtError::PlaceholderError(msg) => write!(f, "Placeholder error: {}", msg),
            MtError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for MtError {
    fn from(err: serde_json::Error) -> Self {
        MtError::InputFormatError(err.to_string())
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;
