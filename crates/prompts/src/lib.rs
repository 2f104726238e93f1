//! Prompt assembly and best-effort response parsing.
//!
//! The builder pins a fixed section-header schema into every prompt so
//! the parser can reliably locate each part of the free-text response.
//! Parsing is a pipeline of independent extractors, each returning its
//! result or a documented default — a miss in one extractor never blocks
//! another, and nothing here ever errors.

pub mod builder;
pub mod failures;
pub mod parser;

pub use builder::{DebugPromptInput, PromptBuilder};
pub use failures::FailureScanner;
pub use parser::{ParsedResponse, parse_response};
