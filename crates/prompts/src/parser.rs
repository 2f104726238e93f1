//! Best-effort extraction from free-text model output.
//!
//! Three independent extractors — code, thoughts, complexity — each with
//! a documented default. They are composed without early termination: a
//! miss in one never blocks another, and none of them errors.

use regex_lite::Regex;

/// Default thoughts bullet when no list is found.
const DEFAULT_THOUGHT: &str = "Solution approach based on the problem requirements";

/// Default complexity strings when no labeled line is found.
const DEFAULT_TIME_COMPLEXITY: &str = "O(n) - Linear time complexity";
const DEFAULT_SPACE_COMPLEXITY: &str = "O(n) - Linear space complexity";

/// Everything the extractors pulled out of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub code: String,
    pub thoughts: Vec<String>,
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Run all extractors over a response.
pub fn parse_response(text: &str) -> ParsedResponse {
    ParsedResponse {
        code: extract_code(text),
        thoughts: extract_thoughts(text),
        time_complexity: extract_complexity(text, "time")
            .unwrap_or_else(|| DEFAULT_TIME_COMPLEXITY.to_string()),
        space_complexity: extract_complexity(text, "space")
            .unwrap_or_else(|| DEFAULT_SPACE_COMPLEXITY.to_string()),
    }
}

/// The first fenced code block, or a heuristic line filter when none
/// exists: lines opening with emphasis markers or mentioning
/// "complexity"/"thought" are prose, the rest is assumed to be code.
pub fn extract_code(text: &str) -> String {
    let fenced = Regex::new(r"(?s)```(?:[a-zA-Z0-9_+-]*)\n?(.*?)```").unwrap();
    if let Some(caps) = fenced.captures(text) {
        if let Some(block) = caps.get(1) {
            return block.as_str().trim_end().to_string();
        }
    }

    text.lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            let lower = trimmed.to_lowercase();
            !trimmed.starts_with('*')
                && !trimmed.starts_with('#')
                && !lower.contains("complexity")
                && !lower.contains("thought")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Bullet or numbered items following a Thoughts/Insights/Reasoning/
/// Approach header. Defaults to a single generic bullet.
pub fn extract_thoughts(text: &str) -> Vec<String> {
    let header = Regex::new(r"(?im)^\s*(?:#+\s*)?(?:\*\*)?(thoughts|insights|reasoning|approach)")
        .unwrap();
    let bullet = Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+(.+)$").unwrap();

    let mut thoughts = Vec::new();
    if let Some(m) = header.find(text) {
        let mut in_list = false;
        for line in text[m.end()..].lines().skip(1) {
            if let Some(caps) = bullet.captures(line) {
                in_list = true;
                if let Some(item) = caps.get(1) {
                    thoughts.push(item.as_str().trim().to_string());
                }
            } else if in_list && line.trim().is_empty() {
                break;
            }
        }
    }

    if thoughts.is_empty() {
        thoughts.push(DEFAULT_THOUGHT.to_string());
    }
    thoughts
}

/// The value of a "time complexity:" / "space complexity:" labeled line.
///
/// A bare Big-O token followed by prose is normalized to
/// `O(...) - prose` so downstream display is uniform.
pub fn extract_complexity(text: &str, dimension: &str) -> Option<String> {
    let labeled = Regex::new(&format!(
        r"(?im)^\s*(?:[-*#]+\s*)?(?:\*\*)?{dimension}\s+complexity(?:\*\*)?\s*[:=]?\s*(.+)$"
    ))
    .unwrap();

    let value = labeled
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('.').to_string())
        .filter(|s| !s.is_empty())?;

    Some(normalize_big_o(&value))
}

fn normalize_big_o(value: &str) -> String {
    if value.contains(" - ") {
        return value.to_string();
    }
    let big_o = Regex::new(r"^(O\([^)]+\))\s*(.*)$").unwrap();
    match big_o.captures(value) {
        Some(caps) => {
            let token = caps.get(1).map(|m| m.as_str()).unwrap_or(value);
            let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            if rest.is_empty() {
                token.to_string()
            } else {
                format!("{token} - {rest}")
            }
        }
        None => value.to_string(),
    }
}
