//! # SnapSolve Core
//!
//! Domain types, traits, and error definitions for the SnapSolve request
//! orchestration engine. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The engine never constructs a provider client itself. It is handed a
//! [`Transport`] — an injected "send one request" capability — and builds
//! everything else (profile selection, payload shaping, retry policy) on
//! top of that seam. This keeps the orchestration core testable with mock
//! transports and lets the host application swap clients on config change
//! without the core noticing.

pub mod error;
pub mod payload;
pub mod profile;
pub mod solution;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ExecutionError, MemoryError, ProviderError, Result};
pub use payload::{ImageAttachment, MessagePayload, ModelRequest, ModelResponse, Usage};
pub use profile::{ModelProfile, SamplingParams, TaskKind, Tier};
pub use solution::{
    DebugResult, FailureCategory, PreviousSolution, ProblemInfo, SolutionResult, TestCaseFailure,
};
pub use transport::Transport;
