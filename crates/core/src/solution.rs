//! Problem, solution, and debugging-history domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured problem data extracted from screenshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInfo {
    /// The full problem statement. Also the correlation key for the
    /// debug memory store (exact string equality, no fuzzy matching).
    pub problem_statement: String,

    /// Stated constraints, verbatim.
    #[serde(default)]
    pub constraints: Vec<String>,

    /// Example inputs as shown in the problem.
    #[serde(default)]
    pub example_inputs: Vec<String>,

    /// Example outputs as shown in the problem.
    #[serde(default)]
    pub example_outputs: Vec<String>,
}

/// Result of a solution-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionResult {
    pub code: String,
    pub thoughts: Vec<String>,
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Result of a debug-analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugResult {
    pub code: String,
    pub analysis: String,
    pub thoughts: Vec<String>,
}

/// Category of a failed test case, derived from error vocabulary in the
/// screenshot analysis. Bucketing priority: timeout > memory > runtime >
/// logic (the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureCategory {
    Logic,
    Runtime,
    Timeout,
    Memory,
}

/// One failed test case observed in a debug session.
///
/// Derived transiently from free-text screenshot analysis; persisted only
/// as part of the [`PreviousSolution`] it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseFailure {
    pub test_id: String,
    pub expected: String,
    pub actual: String,
    pub category: FailureCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<String>,
}

/// A prior solution attempt, recorded when a debug session completes.
/// Immutable after creation; evicted once the store exceeds its cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousSolution {
    /// Opaque, time-derived id.
    pub id: String,

    /// The code that was attempted.
    pub code: String,

    /// Whether the attempt was believed to work.
    pub success: bool,

    pub timestamp: DateTime<Utc>,

    /// Implementation language of `code`.
    pub language: String,

    /// Correlation key — matched by exact string equality.
    pub problem_statement: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_test_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PreviousSolution {
    /// Create a new attempt record with a time-derived id.
    pub fn new(
        code: impl Into<String>,
        success: bool,
        language: impl Into<String>,
        problem_statement: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("attempt-{}", now.timestamp_millis()),
            code: code.into(),
            success,
            timestamp: now,
            language: language.into(),
            problem_statement: problem_statement.into(),
            failed_test_ids: None,
            error_message: None,
        }
    }

    pub fn with_failures(mut self, failures: &[TestCaseFailure]) -> Self {
        if !failures.is_empty() {
            self.failed_test_ids = Some(failures.iter().map(|f| f.test_id.clone()).collect());
        }
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_solution_builder() {
        let failures = vec![TestCaseFailure {
            test_id: "3".into(),
            expected: "7".into(),
            actual: "5".into(),
            category: FailureCategory::Logic,
            raw_error: None,
        }];
        let sol = PreviousSolution::new("def solve(): pass", false, "python", "Two Sum")
            .with_failures(&failures)
            .with_error("wrong answer on test 3");

        assert!(sol.id.starts_with("attempt-"));
        assert_eq!(sol.failed_test_ids.as_deref(), Some(&["3".to_string()][..]));
        assert_eq!(sol.error_message.as_deref(), Some("wrong answer on test 3"));
        assert!(!sol.success);
    }

    #[test]
    fn problem_info_tolerates_missing_fields() {
        let info: ProblemInfo =
            serde_json::from_str(r#"{"problem_statement": "Reverse a list"}"#).unwrap();
        assert_eq!(info.problem_statement, "Reverse a list");
        assert!(info.constraints.is_empty());
    }
}
