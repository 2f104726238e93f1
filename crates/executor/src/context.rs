//! Per-invocation mutable request state.

use snapsolve_core::{ImageAttachment, ModelProfile, ModelRequest, TaskKind};
use snapsolve_models::{ProfileRegistry, clamp_budget, select_profile, shape_images};

/// Mutable state for one in-flight executor invocation.
///
/// Owned exclusively by the invocation and discarded at call end. The
/// profile, output budget, and image list may all shrink or change across
/// retries; the attempt counter only grows.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The profile for the next attempt.
    pub profile: ModelProfile,

    /// Current output-token budget.
    pub output_budget: u32,

    /// Current (already shaped) image list.
    pub images: Vec<ImageAttachment>,

    /// Attempts issued so far.
    pub attempt: u32,

    pub task: TaskKind,
}

impl RequestContext {
    /// Build the initial context: run the selector, shape the payload to
    /// the chosen profile, and start the budget at the profile ceiling.
    pub fn initialize(
        registry: &ProfileRegistry,
        requested_model: &str,
        images: &[ImageAttachment],
        task: TaskKind,
    ) -> Self {
        let profile = select_profile(registry, requested_model, images.len(), task).clone();
        let shaped = shape_images(images, &profile);
        let budget = profile.max_output_tokens;
        Self {
            profile,
            output_budget: budget,
            images: shaped,
            attempt: 0,
            task,
        }
    }

    /// Switch to a new profile, re-clamping the budget and re-shaping the
    /// image list to its ceilings.
    pub fn switch_profile(&mut self, profile: &ModelProfile) {
        self.output_budget = clamp_budget(self.output_budget, profile);
        self.images = shape_images(&self.images, profile);
        self.profile = profile.clone();
    }

    /// Materialize the next attempt's request from the current state.
    pub fn to_request(&self, text: &str) -> ModelRequest {
        ModelRequest {
            model: self.profile.name.clone(),
            text: text.to_string(),
            images: self.images.clone(),
            max_output_tokens: self.output_budget,
            temperature: self.profile.sampling.temperature,
            top_k: Some(self.profile.sampling.top_k),
            top_p: Some(self.profile.sampling.top_p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ImageAttachment> {
        (0..n)
            .map(|i| ImageAttachment {
                media_type: "image/png".into(),
                data: format!("img-{i}"),
            })
            .collect()
    }

    #[test]
    fn initialize_shapes_and_budgets() {
        let registry = ProfileRegistry::built_in();
        let ctx = RequestContext::initialize(&registry, "gpt-4o", &images(40), TaskKind::Solution);

        assert_eq!(ctx.profile.name, "gpt-4o");
        assert_eq!(ctx.images.len(), 32); // gpt-4o ceiling
        assert_eq!(ctx.output_budget, 16_384);
        assert_eq!(ctx.attempt, 0);
    }

    #[test]
    fn switch_profile_reshapes_and_reclamps() {
        let registry = ProfileRegistry::built_in();
        let mut ctx =
            RequestContext::initialize(&registry, "gpt-4o", &images(32), TaskKind::Solution);

        ctx.switch_profile(registry.profile("gpt-4o-mini"));
        assert_eq!(ctx.profile.name, "gpt-4o-mini");
        assert_eq!(ctx.images.len(), 8);
        assert_eq!(ctx.output_budget, 8_192);
    }

    #[test]
    fn request_carries_sampling_defaults() {
        let registry = ProfileRegistry::built_in();
        let ctx = RequestContext::initialize(&registry, "gpt-4o", &images(2), TaskKind::Extraction);
        let request = ctx.to_request("extract the problem");

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.images.len(), 2);
        assert_eq!(request.max_output_tokens, 16_384);
        assert_eq!(request.top_k, Some(32));
    }
}
