//! Error types for the SnapSolve domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all SnapSolve operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Execution errors (retry loop outcomes) ---
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Structured-output errors ---
    #[error("Could not understand the model response: {0}")]
    MalformedResponse(String),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A failure reported by (or on the way to) the model provider.
///
/// Variants map onto the recovery taxonomy: shape errors
/// ([`TokenLimitExceeded`](Self::TokenLimitExceeded),
/// [`ImageLimitExceeded`](Self::ImageLimitExceeded)) are fixed by shrinking
/// the request, transport errors ([`Network`](Self::Network),
/// [`Timeout`](Self::Timeout)) by choosing a more reliable tier, and
/// authorization/quota errors are surfaced verbatim.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Output token limit exceeded at budget {budget}")]
    TokenLimitExceeded { budget: u32 },

    #[error("Too many attached images: {count}")]
    ImageLimitExceeded { count: usize },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Human-actionable guidance for surfaced errors, shown to the user
    /// instead of a raw provider code.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::ApiError { .. } => "The provider rejected the request. Try again in a moment.",
            Self::TokenLimitExceeded { .. } => {
                "The response was too large. Try a smaller problem or fewer screenshots."
            }
            Self::ImageLimitExceeded { .. } => "Reduce the number of attached screenshots.",
            Self::RateLimited { .. } => "Rate limited. Wait before retrying.",
            Self::AuthenticationFailed(_) => "Check that your API key is valid and has quota.",
            Self::NotConfigured(_) => "Configure a provider and model before submitting.",
            Self::Timeout(_) | Self::Network(_) => {
                "Connection problem. Check your network and retry."
            }
        }
    }
}

/// Terminal outcome of a request-executor invocation that did not succeed.
///
/// Cancellation is deliberately a distinct variant: it is caller-initiated
/// and never counts as a failure, so callers can tell "the user aborted"
/// apart from "the request could not be completed".
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Request canceled")]
    Canceled,

    #[error("All {attempts} attempts failed: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    /// Authorization, quota, and other non-recoverable failures propagate
    /// on first occurrence without consuming the retry budget.
    #[error(transparent)]
    Fatal(#[from] ProviderError),
}

impl ExecutionError {
    /// The underlying provider error, when one exists.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Canceled => None,
            Self::Exhausted { source, .. } => Some(source),
            Self::Fatal(e) => Some(e),
        }
    }

    /// Whether this outcome was a caller-initiated cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Deserialization failed: {0}")]
    Corrupt(String),
}
