use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown coin: {0}")]
    UnknownCoin(String),

    #[error("Provider request failed: {0}")]
    Provider(String),

    #[error("Provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl SyncError {
    /// Whether the caller caused this error (bad or missing input) rather than
    /// an upstream or persistence failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SyncError::MissingParameter(_)
                | SyncError::InvalidParameter(_)
                | SyncError::UnknownCoin(_)
        )
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::MissingEnvVar(_) | SyncError::Config(_) => "config",
            SyncError::MissingParameter(_) => "missing_parameter",
            SyncError::InvalidParameter(_) => "invalid_parameter",
            SyncError::UnknownCoin(_) => "unknown_coin",
            SyncError::Provider(_) | SyncError::ProviderStatus { .. } => "upstream",
            SyncError::Decode(_) => "decode",
            SyncError::Database(_) => "database",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(SyncError::MissingParameter("userId").is_client_error());
        assert!(SyncError::InvalidParameter("days=2".into()).is_client_error());
        assert!(SyncError::UnknownCoin("nope".into()).is_client_error());

        assert!(!SyncError::Provider("connection reset".into()).is_client_error());
        assert!(!SyncError::Database("deadlock".into()).is_client_error());
    }

    #[test]
    fn test_kind_labels() {
        let err = SyncError::ProviderStatus {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.kind(), "upstream");
        assert_eq!(err.to_string(), "Provider returned 429: rate limited");
    }
}
