//! Pure error classification — maps (error, context) to a recovery action.
//!
//! Keeping this a pure function makes the retry policy unit-testable
//! without a live transport. The loop in [`crate::executor`] applies the
//! resulting action to the context; nothing here performs I/O.

use crate::context::RequestContext;
use snapsolve_core::ProviderError;
use std::time::Duration;

/// The output-token budget never drops below this floor. Once at the
/// floor, a further token-limit rejection downgrades the model instead.
pub const TOKEN_BUDGET_FLOOR: u32 = 2048;

/// Backoff base and cap for unclassified failures, in milliseconds.
const BACKOFF_BASE_MS: u64 = 1000;
const BACKOFF_CAP_MS: u64 = 5000;

/// What the retry loop should do about a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Shape error with headroom: halve the output-token budget.
    HalveBudget,
    /// Shape error at the floor: switch to the lightest registered profile.
    DowngradeToLightest,
    /// Image rejection with more than one image: halve the image list.
    HalveImages,
    /// Transport error: step down one tier in the reliability ordering.
    StepDownTier,
    /// Unclassified failure: wait, then retry unchanged.
    Backoff(Duration),
    /// Not locally recoverable: surface immediately without retrying.
    FailFast,
}

/// Exponential backoff for unclassified failures:
/// `min(1000 * 2^(attempt-1), 5000)` ms.
pub fn backoff_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    Duration::from_millis((BACKOFF_BASE_MS << exp).min(BACKOFF_CAP_MS))
}

/// Classify a provider failure against the current request state.
pub fn classify(error: &ProviderError, ctx: &RequestContext) -> RecoveryAction {
    match error {
        ProviderError::TokenLimitExceeded { .. } => {
            if ctx.output_budget > TOKEN_BUDGET_FLOOR {
                RecoveryAction::HalveBudget
            } else {
                RecoveryAction::DowngradeToLightest
            }
        }
        ProviderError::ImageLimitExceeded { .. } => {
            if ctx.images.len() > 1 {
                RecoveryAction::HalveImages
            } else {
                // Nothing left to drop; give it one more chance.
                RecoveryAction::Backoff(backoff_delay(ctx.attempt))
            }
        }
        ProviderError::Network(_) | ProviderError::Timeout(_) => RecoveryAction::StepDownTier,
        ProviderError::RateLimited { .. }
        | ProviderError::AuthenticationFailed(_)
        | ProviderError::NotConfigured(_) => RecoveryAction::FailFast,
        ProviderError::ApiError { .. } => RecoveryAction::Backoff(backoff_delay(ctx.attempt)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsolve_core::{ImageAttachment, TaskKind};
    use snapsolve_models::ProfileRegistry;

    fn ctx_with(budget: u32, image_count: usize, attempt: u32) -> RequestContext {
        let registry = ProfileRegistry::built_in();
        let images: Vec<_> = (0..image_count)
            .map(|i| ImageAttachment {
                media_type: "image/png".into(),
                data: format!("{i}"),
            })
            .collect();
        let mut ctx =
            RequestContext::initialize(&registry, "gpt-4o", &images, TaskKind::Solution);
        ctx.output_budget = budget;
        ctx.attempt = attempt;
        ctx
    }

    #[test]
    fn token_limit_above_floor_halves_budget() {
        let action = classify(
            &ProviderError::TokenLimitExceeded { budget: 8192 },
            &ctx_with(8192, 0, 1),
        );
        assert_eq!(action, RecoveryAction::HalveBudget);
    }

    #[test]
    fn token_limit_at_floor_downgrades() {
        let action = classify(
            &ProviderError::TokenLimitExceeded { budget: 2048 },
            &ctx_with(TOKEN_BUDGET_FLOOR, 0, 2),
        );
        assert_eq!(action, RecoveryAction::DowngradeToLightest);
    }

    #[test]
    fn image_rejection_halves_when_droppable() {
        let action = classify(
            &ProviderError::ImageLimitExceeded { count: 8 },
            &ctx_with(8192, 8, 1),
        );
        assert_eq!(action, RecoveryAction::HalveImages);
    }

    #[test]
    fn image_rejection_with_single_image_backs_off() {
        let action = classify(
            &ProviderError::ImageLimitExceeded { count: 1 },
            &ctx_with(8192, 1, 1),
        );
        assert!(matches!(action, RecoveryAction::Backoff(_)));
    }

    #[test]
    fn transport_errors_step_down_tier() {
        let ctx = ctx_with(8192, 2, 1);
        assert_eq!(
            classify(&ProviderError::Timeout("read timed out".into()), &ctx),
            RecoveryAction::StepDownTier
        );
        assert_eq!(
            classify(&ProviderError::Network("connection reset".into()), &ctx),
            RecoveryAction::StepDownTier
        );
    }

    #[test]
    fn auth_and_quota_fail_fast() {
        let ctx = ctx_with(8192, 2, 1);
        assert_eq!(
            classify(
                &ProviderError::RateLimited {
                    retry_after_secs: 60
                },
                &ctx
            ),
            RecoveryAction::FailFast
        );
        assert_eq!(
            classify(&ProviderError::AuthenticationFailed("bad key".into()), &ctx),
            RecoveryAction::FailFast
        );
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(3), Duration::from_millis(4000));
        assert_eq!(backoff_delay(4), Duration::from_millis(5000));
        assert_eq!(backoff_delay(10), Duration::from_millis(5000));
    }
}
