//! Public facade for the SnapSolve orchestration engine.
//!
//! Exposes the three operations the host application calls —
//! [`Session::extract_problem`], [`Session::generate_solution`], and
//! [`Session::debug_solution`] — wired through the prompt builder, model
//! selector, payload shaper, request executor, and debug memory store.
//!
//! Two independent flows exist per session: the primary flow (extraction
//! and solution) and the auxiliary debug flow. Each is cancellable on its
//! own token; canceling one never affects the other.

pub mod http;
pub mod session;

pub use http::HttpTransport;
pub use session::Session;
