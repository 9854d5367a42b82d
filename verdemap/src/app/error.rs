//! Application error types.

use thiserror::Error;

use crate::ndvi::ClientError;

/// Errors that can occur while wiring up a session.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to construct the HTTP client.
    #[error("failed to create processing client: {0}")]
    ClientSetup(#[from] ClientError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config("missing endpoint".to_string());
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("missing endpoint"));
    }

    #[test]
    fn test_app_error_from_client_error() {
        let client_err = ClientError::Transport("tls setup failed".to_string());
        let app_err: AppError = client_err.into();
        assert!(matches!(app_err, AppError::ClientSetup(_)));
    }
}
