//! # Flow Error Types
//!
//! Typed error handling for the intent-flow orchestrator.
//! All orchestration operations return `Result<T, FlowError>`.

use thiserror::Error;

/// Core error type for all checkout-flow operations
#[derive(Debug, Error)]
pub enum FlowError {
    /// Configuration errors (missing endpoint, invalid options)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network/HTTP error communicating with the intent endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// Intent endpoint fetch exceeded the bounded timeout
    #[error("Intent fetch timed out after {seconds}s")]
    FetchTimeout { seconds: u64 },

    /// Intent endpoint response is missing a required field or is not valid JSON
    #[error("Malformed intent response: missing or invalid field '{field}'")]
    MalformedResponse { field: &'static str },

    /// Payment UI rejected handle construction
    #[error("SDK configuration error: {0}")]
    SdkConfiguration(String),

    /// Presentation failed in the UI layer
    #[error("Presentation error: {0}")]
    Presentation(String),

    /// Operation invoked while the orchestrator is in an incompatible state
    #[error("Cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    /// Serialization/deserialization error (settings blob, request body)
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FlowError {
    /// Returns true if a fresh `prepare()` call may reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowError::Network(_) | FlowError::FetchTimeout { .. }
        )
    }

    /// Returns true for errors produced while parsing the endpoint response
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, FlowError::MalformedResponse { .. })
    }
}

/// Result type alias for checkout-flow operations
pub type FlowResult<T> = Result<T, FlowError>;
