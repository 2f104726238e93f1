//! Transport trait — the injected "send one request" capability.
//!
//! The orchestration core never constructs a provider client. The host
//! hands it a `Transport`; the executor calls `send` once per attempt and
//! classifies whatever comes back. Implementations: HTTP providers, mock
//! transports in tests.

use crate::error::ProviderError;
use crate::payload::{ModelRequest, ModelResponse};
use async_trait::async_trait;

/// One provider call. Implementors must be safe to call concurrently;
/// the executor itself never issues two attempts at once within one
/// invocation, but the primary and debug flows may overlap.
#[async_trait]
pub trait Transport: Send + Sync {
    /// A human-readable name for this transport (e.g. "openai", "mock").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn send(&self, request: ModelRequest) -> Result<ModelResponse, ProviderError>;
}
