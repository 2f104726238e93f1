//! Per-attempt telemetry records.
//!
//! Informational only: records are logged and returned with the final
//! outcome for operational visibility, and never affect control flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a single attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed { error: String },
}

/// One provider attempt as observed by the executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based attempt number within the invocation.
    pub attempt: u32,

    /// Model the attempt was issued against.
    pub model: String,

    pub started_at: DateTime<Utc>,

    /// Wall-clock time spent on the attempt.
    pub elapsed_ms: u64,

    /// Output-token budget in force for the attempt.
    pub output_budget: u32,

    /// Number of images attached to the attempt.
    pub image_count: usize,

    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    pub fn succeeded(&self) -> bool {
        self.outcome == AttemptOutcome::Succeeded
    }
}
