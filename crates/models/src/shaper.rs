//! Payload shaping — trims a request to a profile's ceilings.
//!
//! Truncation keeps the earliest-submitted images: the primary problem
//! screenshot comes before supplementary ones, so a prefix is the most
//! relevant subset. No content-aware re-ranking is performed; this is a
//! documented simplification.

use snapsolve_core::{ImageAttachment, ModelProfile};
use tracing::debug;

/// Return the image list truncated to the profile's image ceiling,
/// preserving original order. The caller's list is never mutated.
pub fn shape_images(images: &[ImageAttachment], profile: &ModelProfile) -> Vec<ImageAttachment> {
    if images.len() > profile.max_images {
        debug!(
            model = %profile.name,
            submitted = images.len(),
            retained = profile.max_images,
            "Truncating image list to profile ceiling"
        );
    }
    images.iter().take(profile.max_images).cloned().collect()
}

/// Clamp a requested output-token budget to the profile's ceiling.
pub fn clamp_budget(requested: u32, profile: &ModelProfile) -> u32 {
    requested.min(profile.max_output_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsolve_core::{SamplingParams, Tier};

    fn profile(max_images: usize) -> ModelProfile {
        ModelProfile {
            name: "test".into(),
            max_input_tokens: 128_000,
            max_output_tokens: 8_192,
            max_images,
            tier: Tier::Light,
            sampling: SamplingParams::default(),
        }
    }

    fn image(n: usize) -> ImageAttachment {
        ImageAttachment {
            media_type: "image/png".into(),
            data: format!("img-{n}"),
        }
    }

    #[test]
    fn truncates_to_exact_ceiling_preserving_prefix_order() {
        let images: Vec<_> = (0..20).map(image).collect();
        let shaped = shape_images(&images, &profile(8));

        assert_eq!(shaped.len(), 8);
        for (i, img) in shaped.iter().enumerate() {
            assert_eq!(img.data, format!("img-{i}"));
        }
    }

    #[test]
    fn under_ceiling_is_untouched() {
        let images: Vec<_> = (0..3).map(image).collect();
        let shaped = shape_images(&images, &profile(8));
        assert_eq!(shaped, images);
    }

    #[test]
    fn caller_list_is_not_mutated() {
        let images: Vec<_> = (0..10).map(image).collect();
        let _ = shape_images(&images, &profile(2));
        assert_eq!(images.len(), 10);
    }

    #[test]
    fn budget_clamps_to_profile_ceiling() {
        let p = profile(8);
        assert_eq!(clamp_budget(32_768, &p), 8_192);
        assert_eq!(clamp_budget(4_096, &p), 4_096);
    }
}
