//! Error Types

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Gateway error types
///
/// Payloads are plain strings so a single failure can be handed to every
/// caller waiting on the same authentication attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Authentication round trip failed (status, transport, or body)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Checkout session could not be created
    #[error("Session creation failed: {0}")]
    SessionCreationFailed(String),

    /// Payment methods could not be listed
    #[error("Failed to fetch payment methods: {0}")]
    PaymentMethodsFetchFailed(String),

    /// Payment initiation was rejected by the gateway
    #[error("Payment initiation failed: {0}")]
    PaymentInitiationFailed(String),

    /// Redirect field is not a well-formed absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// An operation that needs a session id was called without one
    #[error("Session ID is required but was not provided")]
    MissingSessionId,

    /// Connectivity failure below the HTTP layer
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Caller-supplied order, configuration, or environment is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl GatewayError {
    /// Check if a manual retry of the same operation might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport(_) | GatewayError::AuthenticationFailed(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::AuthenticationFailed(_) => {
                "Could not sign in to the payment gateway. Please check your credentials.".into()
            }
            GatewayError::SessionCreationFailed(_) => {
                "Checkout could not be started. Please try again.".into()
            }
            GatewayError::PaymentMethodsFetchFailed(_) => {
                "Payment methods are unavailable right now. Please try again.".into()
            }
            GatewayError::PaymentInitiationFailed(_) => {
                "The payment could not be started. Please choose a method and try again.".into()
            }
            GatewayError::InvalidUrl(_) | GatewayError::InvalidResponse(_) => {
                "The payment gateway sent an unexpected response.".into()
            }
            GatewayError::MissingSessionId => "No checkout session is active.".into(),
            GatewayError::Transport(_) => {
                "The payment gateway could not be reached. Check your connection.".into()
            }
            GatewayError::InvalidConfiguration(msg) => format!("Invalid checkout details: {msg}"),
        }
    }
}
