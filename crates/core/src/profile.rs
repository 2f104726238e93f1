//! Model capability profiles.
//!
//! A [`ModelProfile`] is a named capability envelope for one provider
//! model: token ceilings, image ceiling, sampling defaults, and a tier
//! flag. Profiles are defined once at process start and never mutated;
//! the selector and shaper read them to decide what a request may carry.

use serde::{Deserialize, Serialize};

/// "Fast/light" vs "thorough" capability tier.
///
/// Light models answer quickly with smaller context and attachment
/// budgets; thorough models carry image-heavy and debug workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Light,
    Thorough,
}

/// The kind of task a request serves. Used only to bias model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Extract structured problem data from screenshots.
    Extraction,
    /// Generate a solution for an extracted problem.
    Solution,
    /// Analyze failing code against supplementary screenshots.
    Debug,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extraction => write!(f, "extraction"),
            Self::Solution => write!(f, "solution"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

/// Default sampling parameters for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_k: 32,
            top_p: 0.95,
        }
    }
}

/// A named capability envelope for one provider model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Provider model identifier (e.g. "gpt-4o", "claude-sonnet-4").
    pub name: String,

    /// Maximum input tokens the model accepts.
    pub max_input_tokens: u32,

    /// Maximum output tokens the model can produce.
    pub max_output_tokens: u32,

    /// Maximum number of images attachable to one request.
    pub max_images: usize,

    /// Capability tier.
    pub tier: Tier,

    /// Default sampling parameters.
    #[serde(default)]
    pub sampling: SamplingParams,
}

impl ModelProfile {
    pub fn is_light(&self) -> bool {
        self.tier == Tier::Light
    }

    pub fn is_thorough(&self) -> bool {
        self.tier == Tier::Thorough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_predicates() {
        let profile = ModelProfile {
            name: "test-light".into(),
            max_input_tokens: 128_000,
            max_output_tokens: 8192,
            max_images: 8,
            tier: Tier::Light,
            sampling: SamplingParams::default(),
        };
        assert!(profile.is_light());
        assert!(!profile.is_thorough());
    }

    #[test]
    fn profile_round_trips_through_json() {
        let profile = ModelProfile {
            name: "claude-sonnet-4".into(),
            max_input_tokens: 200_000,
            max_output_tokens: 16_384,
            max_images: 20,
            tier: Tier::Thorough,
            sampling: SamplingParams::default(),
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: ModelProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
