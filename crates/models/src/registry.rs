//! Capability registry — the static table of model profiles.
//!
//! Profiles are registered once at startup and never mutated. Lookup by
//! unknown name falls back to the designated default profile: that is a
//! policy decision (always have a usable envelope), not an error.

use snapsolve_core::{ModelProfile, SamplingParams, Tier};
use std::collections::HashMap;
use tracing::debug;

/// Registry of model capability profiles with a designated default and a
/// fixed reliability ordering used by transport-failure downgrades.
pub struct ProfileRegistry {
    profiles: HashMap<String, ModelProfile>,
    default_name: String,
    /// Tier step-down order for transport failures:
    /// thorough → light → secondary-thorough.
    reliability_order: Vec<String>,
}

impl ProfileRegistry {
    /// Create an empty registry. The first registered profile becomes the
    /// default until [`set_default`](Self::set_default) is called.
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
            default_name: String::new(),
            reliability_order: Vec::new(),
        }
    }

    /// The built-in profile set. Two thorough profiles with distinct
    /// ceilings plus one light profile, ordered for reliability as
    /// [best thorough, light, secondary thorough].
    pub fn built_in() -> Self {
        let mut registry = Self::new();

        registry.register(ModelProfile {
            name: "gpt-4o".into(),
            max_input_tokens: 128_000,
            max_output_tokens: 16_384,
            max_images: 32,
            tier: Tier::Thorough,
            sampling: SamplingParams::default(),
        });
        registry.register(ModelProfile {
            name: "gpt-4o-mini".into(),
            max_input_tokens: 128_000,
            max_output_tokens: 8_192,
            max_images: 8,
            tier: Tier::Light,
            sampling: SamplingParams::default(),
        });
        registry.register(ModelProfile {
            name: "claude-sonnet-4".into(),
            max_input_tokens: 200_000,
            max_output_tokens: 16_384,
            max_images: 20,
            tier: Tier::Thorough,
            sampling: SamplingParams {
                temperature: 0.0,
                top_k: 40,
                top_p: 0.95,
            },
        });

        registry.set_default("gpt-4o");
        registry.set_reliability_order(["gpt-4o", "gpt-4o-mini", "claude-sonnet-4"]);
        registry
    }

    /// Register a profile. The first registration becomes the default.
    pub fn register(&mut self, profile: ModelProfile) {
        if self.default_name.is_empty() {
            self.default_name = profile.name.clone();
        }
        debug!(model = %profile.name, tier = ?profile.tier, "Registered model profile");
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Designate the default profile. Ignored if the name is unregistered.
    pub fn set_default(&mut self, name: &str) {
        if self.profiles.contains_key(name) {
            self.default_name = name.to_string();
        }
    }

    /// Set the fixed reliability ordering. Unregistered names are dropped.
    pub fn set_reliability_order<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reliability_order = names
            .into_iter()
            .map(Into::into)
            .filter(|n| self.profiles.contains_key(n))
            .collect();
    }

    /// Look up a profile by name, falling back to the default profile when
    /// the name is unknown.
    pub fn profile(&self, name: &str) -> &ModelProfile {
        self.profiles.get(name).unwrap_or_else(|| self.default())
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// The designated default profile.
    ///
    /// Panics if the registry is empty; construction via `built_in` or at
    /// least one `register` call is a precondition.
    pub fn default(&self) -> &ModelProfile {
        self.profiles
            .get(&self.default_name)
            .or_else(|| self.profiles.values().next())
            .unwrap_or_else(|| panic!("profile registry is empty"))
    }

    /// The lightest registered profile: the light-tier profile with the
    /// smallest output ceiling, else the smallest overall.
    pub fn lightest(&self) -> &ModelProfile {
        self.profiles
            .values()
            .filter(|p| p.is_light())
            .min_by_key(|p| p.max_output_tokens)
            .unwrap_or_else(|| {
                self.profiles
                    .values()
                    .min_by_key(|p| p.max_output_tokens)
                    .unwrap_or_else(|| self.default())
            })
    }

    /// The thorough profile with the largest image ceiling, if any
    /// thorough profile is registered.
    pub fn best_thorough(&self) -> Option<&ModelProfile> {
        self.profiles
            .values()
            .filter(|p| p.is_thorough())
            .max_by_key(|p| (p.max_images, p.max_output_tokens))
    }

    /// A thorough profile whose image ceiling accommodates `image_count`,
    /// preferring the smallest sufficient ceiling.
    pub fn thorough_with_capacity(&self, image_count: usize) -> Option<&ModelProfile> {
        self.profiles
            .values()
            .filter(|p| p.is_thorough() && p.max_images >= image_count)
            .min_by_key(|p| p.max_images)
    }

    /// The next profile after `name` in the reliability ordering. Returns
    /// `None` when `name` is last (no wrap-around) or not in the ordering.
    pub fn next_reliable_after(&self, name: &str) -> Option<&ModelProfile> {
        let pos = self.reliability_order.iter().position(|n| n == name)?;
        let next = self.reliability_order.get(pos + 1)?;
        self.profiles.get(next)
    }

    /// All registered profile names.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_falls_back_to_default() {
        let registry = ProfileRegistry::built_in();
        let profile = registry.profile("model-that-does-not-exist");
        assert_eq!(profile.name, "gpt-4o");
    }

    #[test]
    fn lightest_prefers_light_tier() {
        let registry = ProfileRegistry::built_in();
        assert_eq!(registry.lightest().name, "gpt-4o-mini");
    }

    #[test]
    fn best_thorough_has_largest_image_ceiling() {
        let registry = ProfileRegistry::built_in();
        let best = registry.best_thorough().unwrap();
        assert_eq!(best.name, "gpt-4o");
        assert_eq!(best.max_images, 32);
    }

    #[test]
    fn thorough_with_capacity_picks_smallest_sufficient() {
        let registry = ProfileRegistry::built_in();
        // 12 images fit both thorough profiles; the tighter one wins.
        assert_eq!(
            registry.thorough_with_capacity(12).unwrap().name,
            "claude-sonnet-4"
        );
        // 25 images only fit gpt-4o.
        assert_eq!(registry.thorough_with_capacity(25).unwrap().name, "gpt-4o");
        // 50 images fit nothing.
        assert!(registry.thorough_with_capacity(50).is_none());
    }

    #[test]
    fn reliability_order_steps_down_without_wrapping() {
        let registry = ProfileRegistry::built_in();
        assert_eq!(
            registry.next_reliable_after("gpt-4o").unwrap().name,
            "gpt-4o-mini"
        );
        assert_eq!(
            registry.next_reliable_after("gpt-4o-mini").unwrap().name,
            "claude-sonnet-4"
        );
        assert!(registry.next_reliable_after("claude-sonnet-4").is_none());
        assert!(registry.next_reliable_after("unregistered").is_none());
    }

    #[test]
    fn first_registration_becomes_default() {
        let mut registry = ProfileRegistry::new();
        registry.register(ModelProfile {
            name: "only-model".into(),
            max_input_tokens: 1000,
            max_output_tokens: 100,
            max_images: 1,
            tier: Tier::Light,
            sampling: SamplingParams::default(),
        });
        assert_eq!(registry.default().name, "only-model");
    }
}
