//! The retry loop — applies classified recovery actions attempt by attempt.

use crate::classify::{RecoveryAction, TOKEN_BUDGET_FLOOR, classify};
use crate::context::RequestContext;
use crate::telemetry::{AttemptOutcome, AttemptRecord};
use chrono::Utc;
use snapsolve_core::error::ExecutionError;
use snapsolve_core::{MessagePayload, ModelResponse, TaskKind, Tier, Transport};
use snapsolve_models::ProfileRegistry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Per-attempt transport timeouts by tier. Light models answer fast or
/// not at all; thorough models are given room to work.
const LIGHT_TIMEOUT: Duration = Duration::from_secs(30);
const THOROUGH_TIMEOUT: Duration = Duration::from_secs(120);

/// A successful invocation: the raw response plus the attempt trail.
#[derive(Debug)]
pub struct Execution {
    pub response: ModelResponse,
    pub attempts: Vec<AttemptRecord>,
}

/// Drives one bounded retry/fallback loop over an injected [`Transport`].
///
/// Retries within an invocation are strictly sequential: each retry
/// depends on the classified outcome of the previous attempt.
pub struct RequestExecutor {
    registry: Arc<ProfileRegistry>,
    transport: Arc<dyn Transport>,
    max_attempts: u32,
}

impl RequestExecutor {
    pub fn new(registry: Arc<ProfileRegistry>, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
            max_attempts: 3,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Run the loop until success, exhaustion, a fatal error, or
    /// cancellation. Cancellation aborts immediately regardless of the
    /// attempt count and is never reported as a failure.
    pub async fn execute(
        &self,
        requested_model: &str,
        payload: &MessagePayload,
        task: TaskKind,
        cancel: &CancellationToken,
    ) -> Result<Execution, ExecutionError> {
        let mut ctx =
            RequestContext::initialize(&self.registry, requested_model, &payload.images, task);
        let mut attempts: Vec<AttemptRecord> = Vec::new();
        let mut last_error = None;

        while ctx.attempt < self.max_attempts {
            ctx.attempt += 1;

            info!(
                model = %ctx.profile.name,
                attempt = ctx.attempt,
                max_attempts = self.max_attempts,
                budget = ctx.output_budget,
                images = ctx.images.len(),
                task = %ctx.task,
                "Issuing provider attempt"
            );

            let started = Instant::now();
            let started_at = Utc::now();
            let result = self.one_attempt(&ctx, &payload.text, cancel).await?;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let mut record = AttemptRecord {
                attempt: ctx.attempt,
                model: ctx.profile.name.clone(),
                started_at,
                elapsed_ms,
                output_budget: ctx.output_budget,
                image_count: ctx.images.len(),
                outcome: AttemptOutcome::Succeeded,
            };

            match result {
                Ok(response) => {
                    info!(
                        model = %ctx.profile.name,
                        attempt = ctx.attempt,
                        elapsed_ms,
                        "Provider attempt succeeded"
                    );
                    attempts.push(record);
                    return Ok(Execution { response, attempts });
                }
                Err(error) => {
                    warn!(
                        model = %ctx.profile.name,
                        attempt = ctx.attempt,
                        elapsed_ms,
                        error = %error,
                        "Provider attempt failed"
                    );
                    record.outcome = AttemptOutcome::Failed {
                        error: error.to_string(),
                    };
                    attempts.push(record);

                    let action = classify(&error, &ctx);
                    if action == RecoveryAction::FailFast {
                        return Err(ExecutionError::Fatal(error));
                    }

                    last_error = Some(error);
                    if ctx.attempt >= self.max_attempts {
                        break;
                    }
                    self.apply(action, &mut ctx, cancel).await?;
                }
            }
        }

        Err(ExecutionError::Exhausted {
            attempts: ctx.attempt,
            source: last_error.unwrap_or_else(|| {
                snapsolve_core::ProviderError::NotConfigured("no attempt was issued".into())
            }),
        })
    }

    /// Issue one transport call under the tier timeout, racing against
    /// cancellation.
    async fn one_attempt(
        &self,
        ctx: &RequestContext,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Result<ModelResponse, snapsolve_core::ProviderError>, ExecutionError> {
        let timeout = match ctx.profile.tier {
            Tier::Light => LIGHT_TIMEOUT,
            Tier::Thorough => THOROUGH_TIMEOUT,
        };
        let request = ctx.to_request(text);

        tokio::select! {
            _ = cancel.cancelled() => Err(ExecutionError::Canceled),
            result = tokio::time::timeout(timeout, self.transport.send(request)) => {
                Ok(match result {
                    Ok(inner) => inner,
                    Err(_) => Err(snapsolve_core::ProviderError::Timeout(format!(
                        "Attempt against '{}' timed out after {}s",
                        ctx.profile.name,
                        timeout.as_secs()
                    ))),
                })
            }
        }
    }

    /// Apply a recovery action to the context before the next attempt.
    async fn apply(
        &self,
        action: RecoveryAction,
        ctx: &mut RequestContext,
        cancel: &CancellationToken,
    ) -> Result<(), ExecutionError> {
        match action {
            RecoveryAction::HalveBudget => {
                let next = (ctx.output_budget / 2).max(TOKEN_BUDGET_FLOOR);
                info!(from = ctx.output_budget, to = next, "Halving output-token budget");
                ctx.output_budget = next;
            }
            RecoveryAction::DowngradeToLightest => {
                let lightest = self.registry.lightest();
                info!(
                    from = %ctx.profile.name,
                    to = %lightest.name,
                    "Budget at floor, downgrading to lightest profile"
                );
                ctx.switch_profile(lightest);
            }
            RecoveryAction::HalveImages => {
                let keep = (ctx.images.len() / 2).max(1);
                info!(from = ctx.images.len(), to = keep, "Halving image list");
                ctx.images.truncate(keep);
            }
            RecoveryAction::StepDownTier => {
                match self.registry.next_reliable_after(&ctx.profile.name) {
                    Some(next) => {
                        info!(
                            from = %ctx.profile.name,
                            to = %next.name,
                            "Stepping down reliability ordering"
                        );
                        ctx.switch_profile(next);
                    }
                    // End of the ordering: retry in place.
                    None => warn!(
                        model = %ctx.profile.name,
                        "No further tier to step down to, retrying same model"
                    ),
                }
            }
            RecoveryAction::Backoff(delay) => {
                info!(delay_ms = delay.as_millis() as u64, "Backing off before retry");
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ExecutionError::Canceled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            // Handled by the caller before apply.
            RecoveryAction::FailFast => {}
        }
        Ok(())
    }
}
