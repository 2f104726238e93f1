//! Task-specific prompt assembly.
//!
//! Every prompt pins the expected output structure (a fixed
//! section-header schema) so the response parser can reliably locate
//! each part. Debug prompts fold in debugging memory: the current code,
//! the last known working solution, itemized test failures, and a terse
//! summary of recent unsuccessful attempts — in that order.

use snapsolve_core::{PreviousSolution, ProblemInfo, TestCaseFailure};
use std::fmt::Write as _;

/// Everything a debug prompt can draw on.
pub struct DebugPromptInput<'a> {
    pub problem_statement: &'a str,
    pub current_code: &'a str,
    pub analysis: &'a str,
    pub failures: &'a [TestCaseFailure],
    pub last_working: Option<&'a PreviousSolution>,
    pub recent_attempts: &'a [PreviousSolution],
}

/// Builds extraction, solution, and debug prompts for one output language.
pub struct PromptBuilder {
    language: String,
}

impl PromptBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Prompt for extracting structured problem data from screenshots.
    /// The response must be strict JSON; anything else is a parse error.
    pub fn extraction_prompt(&self) -> String {
        concat!(
            "You are given screenshots of a coding problem. Extract the problem ",
            "into JSON with exactly these fields: \"problem_statement\" (string), ",
            "\"constraints\" (array of strings), \"example_inputs\" (array of ",
            "strings), \"example_outputs\" (array of strings).\n",
            "Respond with the JSON object only. No prose, no code fences."
        )
        .to_string()
    }

    /// Prompt for generating a solution to an extracted problem.
    pub fn solution_prompt(&self, problem: &ProblemInfo) -> String {
        let mut prompt = String::new();
        let _ = writeln!(prompt, "Solve the following problem in {}.", self.language);
        let _ = writeln!(prompt, "\n## Problem\n{}", problem.problem_statement);

        if !problem.constraints.is_empty() {
            let _ = writeln!(prompt, "\n## Constraints");
            for constraint in &problem.constraints {
                let _ = writeln!(prompt, "- {constraint}");
            }
        }
        for (input, output) in problem.example_inputs.iter().zip(&problem.example_outputs) {
            let _ = writeln!(prompt, "\n## Example\nInput: {input}\nOutput: {output}");
        }

        prompt.push_str(&self.output_schema(&["Thoughts", "Code", "Complexity"]));
        prompt
    }

    /// Prompt for the first debug pass: describe what the supplementary
    /// screenshots show about failing tests. The free-text answer feeds
    /// the failure scanner.
    pub fn analysis_prompt(&self) -> String {
        concat!(
            "These screenshots show test results for a failing solution. ",
            "Describe every failing test case you can see: its number, the ",
            "expected output, the actual output, and any error text ",
            "(timeout, memory, runtime, assertion). Plain text, one test ",
            "case per line."
        )
        .to_string()
    }

    /// Prompt for debugging a failing solution against new screenshots.
    pub fn debug_prompt(&self, input: &DebugPromptInput<'_>) -> String {
        let mut prompt = String::new();
        let _ = writeln!(
            prompt,
            "The following {} solution is failing. Analyze the failures and produce a corrected version.",
            self.language
        );
        let _ = writeln!(prompt, "\n## Problem\n{}", input.problem_statement);
        let _ = writeln!(prompt, "\n## Current Code\n```\n{}\n```", input.current_code);

        if let Some(working) = input.last_working {
            let _ = writeln!(
                prompt,
                "\n## Last Known Working Solution\n```\n{}\n```",
                working.code
            );
        }

        if !input.failures.is_empty() {
            let _ = writeln!(prompt, "\n## Failed Test Cases");
            for failure in input.failures {
                let _ = writeln!(
                    prompt,
                    "- Test {}: expected {}, got {} ({:?})",
                    failure.test_id, failure.expected, failure.actual, failure.category
                );
            }
        }

        let failed_attempts: Vec<&PreviousSolution> = input
            .recent_attempts
            .iter()
            .filter(|a| !a.success)
            .collect();
        if !failed_attempts.is_empty() {
            let _ = writeln!(prompt, "\n## Recent Unsuccessful Attempts");
            for attempt in failed_attempts {
                let error = attempt.error_message.as_deref().unwrap_or("no error recorded");
                let _ = writeln!(prompt, "- {}: {error}", attempt.id);
            }
        }

        if !input.analysis.trim().is_empty() {
            let _ = writeln!(prompt, "\n## Screenshot Analysis\n{}", input.analysis);
        }

        prompt.push_str(&self.output_schema(&["Thoughts", "Code", "Analysis"]));
        prompt
    }

    /// The pinned response schema: fixed headers the parser keys on.
    fn output_schema(&self, sections: &[&str]) -> String {
        let mut schema = String::from("\nStructure your response using exactly these sections:\n");
        for section in sections {
            match *section {
                "Thoughts" => schema.push_str("### Thoughts\nBullet points of your reasoning.\n"),
                "Code" => {
                    let _ = writeln!(
                        schema,
                        "### Code\nA single fenced {} code block.",
                        self.language
                    );
                }
                "Analysis" => schema.push_str("### Analysis\nWhat was wrong and what changed.\n"),
                "Complexity" => schema.push_str(
                    "### Complexity\nTime complexity: O(...)\nSpace complexity: O(...)\n",
                ),
                _ => {}
            }
        }
        schema
    }
}
