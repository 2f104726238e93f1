//! Request executor — the adaptive retry and fallback engine.
//!
//! One invocation drives a bounded loop of provider attempts:
//!
//! ```text
//! Attempting → { Success, Retrying, ExhaustedFailure, Canceled }
//! ```
//!
//! Failures are not homogeneous. A token overflow is a request-shape
//! problem (shrink the request), a network failure is a transport problem
//! (choose a more reliable tier), and an unclassified failure gets one
//! more chance via backoff. The mapping from error to recovery action is
//! a pure function in [`classify`], unit-testable without a network; the
//! loop in [`executor`] only applies it.

pub mod classify;
pub mod context;
pub mod executor;
pub mod telemetry;

pub use classify::{RecoveryAction, TOKEN_BUDGET_FLOOR, backoff_delay, classify};
pub use context::RequestContext;
pub use executor::{Execution, RequestExecutor};
pub use telemetry::{AttemptOutcome, AttemptRecord};
