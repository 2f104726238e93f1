//! Model selection policy — picks the profile for the first attempt.
//!
//! Image-heavy or debug workloads need larger context and attachment
//! budgets; upgrading before the call avoids issuing a request that is
//! guaranteed to be rejected.

use crate::registry::ProfileRegistry;
use snapsolve_core::{ModelProfile, TaskKind};
use tracing::info;

/// Debug sessions carrying more images than this prefer a thorough tier.
const DEBUG_IMAGE_THRESHOLD: usize = 5;

/// Choose the profile for the first attempt.
///
/// Policy, first match wins:
/// 1. Debug task with more than five images on a light profile → upgrade
///    to the best available thorough profile.
/// 2. Image count exceeds the requested profile's ceiling and some
///    thorough profile accommodates it → switch to that profile.
/// 3. Otherwise the requested profile (default if unregistered).
pub fn select_profile<'r>(
    registry: &'r ProfileRegistry,
    requested: &str,
    image_count: usize,
    task: TaskKind,
) -> &'r ModelProfile {
    let requested_profile = registry.profile(requested);

    if task == TaskKind::Debug
        && image_count > DEBUG_IMAGE_THRESHOLD
        && requested_profile.is_light()
    {
        if let Some(thorough) = registry.best_thorough() {
            info!(
                from = %requested_profile.name,
                to = %thorough.name,
                image_count,
                "Upgrading light profile for image-heavy debug task"
            );
            return thorough;
        }
    }

    if image_count > requested_profile.max_images {
        if let Some(capable) = registry.thorough_with_capacity(image_count) {
            info!(
                from = %requested_profile.name,
                to = %capable.name,
                image_count,
                ceiling = capable.max_images,
                "Switching profile to accommodate image count"
            );
            return capable;
        }
    }

    requested_profile
}
