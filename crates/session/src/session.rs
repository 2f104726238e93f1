//! The session facade — the three operations the host application calls.

use snapsolve_config::AppConfig;
use snapsolve_core::error::{Error, Result};
use snapsolve_core::{
    DebugResult, ImageAttachment, MessagePayload, PreviousSolution, ProblemInfo, SolutionResult,
    TaskKind,
};
use snapsolve_executor::RequestExecutor;
use snapsolve_memory::{DebugMemoryStore, FileStorage};
use snapsolve_models::ProfileRegistry;
use snapsolve_prompts::{DebugPromptInput, FailureScanner, PromptBuilder, parse_response};
use std::sync::Arc;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How many prior attempts a debug prompt summarizes.
const DEBUG_HISTORY_LIMIT: usize = 5;

/// One logical session over an injected transport.
///
/// Holds two independent cancellation tokens: the primary flow
/// (extraction and solution) and the auxiliary debug flow. Canceling one
/// flow never affects the other.
pub struct Session {
    registry: Arc<ProfileRegistry>,
    transport: Arc<dyn snapsolve_core::Transport>,
    store: Arc<DebugMemoryStore>,
    primary_cancel: Mutex<CancellationToken>,
    debug_cancel: Mutex<CancellationToken>,
}

impl Session {
    pub fn new(
        registry: Arc<ProfileRegistry>,
        transport: Arc<dyn snapsolve_core::Transport>,
        store: Arc<DebugMemoryStore>,
    ) -> Self {
        Self {
            registry,
            transport,
            store,
            primary_cancel: Mutex::new(CancellationToken::new()),
            debug_cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Build a session from configuration: HTTP transport, built-in
    /// registry, file-backed debug memory.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            Error::Provider(snapsolve_core::ProviderError::NotConfigured(
                "No API key configured".into(),
            ))
        })?;
        let base_url = config
            .api_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".into());

        let transport = crate::HttpTransport::new(config.provider.clone(), base_url, api_key)
            .map_err(Error::Provider)?;
        let storage = Arc::new(FileStorage::new(config.memory.path.clone()));
        let store = DebugMemoryStore::load(storage)
            .await
            .with_retention(config.memory.retention);

        Ok(Self::new(
            Arc::new(ProfileRegistry::built_in()),
            Arc::new(transport),
            Arc::new(store),
        ))
    }

    /// Abort the in-flight primary flow, if any. The next primary call
    /// starts fresh.
    pub fn cancel_primary(&self) {
        let mut guard = self.primary_cancel.lock().unwrap();
        guard.cancel();
        *guard = CancellationToken::new();
    }

    /// Abort the in-flight debug flow, if any.
    pub fn cancel_debug(&self) {
        let mut guard = self.debug_cancel.lock().unwrap();
        guard.cancel();
        *guard = CancellationToken::new();
    }

    fn primary_token(&self) -> CancellationToken {
        self.primary_cancel.lock().unwrap().clone()
    }

    fn debug_token(&self) -> CancellationToken {
        self.debug_cancel.lock().unwrap().clone()
    }

    /// The debug memory store, for host-side inspection.
    pub fn store(&self) -> &DebugMemoryStore {
        &self.store
    }

    /// Extract structured problem data from screenshots.
    ///
    /// The model must answer with strict JSON; anything else surfaces as
    /// a "could not understand the response" failure, never a silent
    /// default.
    pub async fn extract_problem(
        &self,
        images: &[ImageAttachment],
        config: &AppConfig,
    ) -> Result<ProblemInfo> {
        let builder = PromptBuilder::new(&config.language);
        let payload = MessagePayload::with_images(builder.extraction_prompt(), images.to_vec());

        let execution = self
            .executor(config)
            .execute(
                config.model_for(TaskKind::Extraction),
                &payload,
                TaskKind::Extraction,
                &self.primary_token(),
            )
            .await?;

        parse_problem_json(&execution.response.text)
    }

    /// Generate a solution for an extracted problem.
    pub async fn generate_solution(
        &self,
        problem: &ProblemInfo,
        config: &AppConfig,
    ) -> Result<SolutionResult> {
        let builder = PromptBuilder::new(&config.language);
        let payload = MessagePayload::text_only(builder.solution_prompt(problem));

        let execution = self
            .executor(config)
            .execute(
                config.model_for(TaskKind::Solution),
                &payload,
                TaskKind::Solution,
                &self.primary_token(),
            )
            .await?;

        let parsed = parse_response(&execution.response.text);
        Ok(SolutionResult {
            code: parsed.code,
            thoughts: parsed.thoughts,
            time_complexity: parsed.time_complexity,
            space_complexity: parsed.space_complexity,
        })
    }

    /// Debug a failing solution against supplementary screenshots.
    ///
    /// Two sequential provider calls: first an analysis pass over the
    /// screenshots, then a corrected-code pass whose prompt folds in the
    /// extracted test failures and the debugging memory for this problem.
    /// The completed session is recorded into the debug memory store.
    pub async fn debug_solution(
        &self,
        images: &[ImageAttachment],
        problem: &ProblemInfo,
        config: &AppConfig,
    ) -> Result<DebugResult> {
        let builder = PromptBuilder::new(&config.language);
        let executor = self.executor(config);
        let cancel = self.debug_token();
        let model = config.model_for(TaskKind::Debug);

        // Pass 1: what do the screenshots say about the failures?
        let analysis_payload =
            MessagePayload::with_images(builder.analysis_prompt(), images.to_vec());
        let analysis = executor
            .execute(model, &analysis_payload, TaskKind::Debug, &cancel)
            .await?
            .response
            .text;

        let failures = FailureScanner::new().scan(&analysis);
        info!(
            failures = failures.len(),
            "Extracted test-case failures from screenshot analysis"
        );

        let history = self
            .store
            .recent_for(&problem.problem_statement, DEBUG_HISTORY_LIMIT)
            .await;
        let last_working = self.store.last_working_for(&problem.problem_statement).await;
        let current_code = history
            .first()
            .map(|a| a.code.clone())
            .unwrap_or_else(|| "(no prior attempt recorded)".into());

        // Pass 2: corrected code, with full debugging context.
        let debug_prompt = builder.debug_prompt(&DebugPromptInput {
            problem_statement: &problem.problem_statement,
            current_code: &current_code,
            analysis: &analysis,
            failures: &failures,
            last_working: last_working.as_ref(),
            recent_attempts: &history,
        });
        let debug_payload = MessagePayload::with_images(debug_prompt, images.to_vec());
        let execution = executor
            .execute(model, &debug_payload, TaskKind::Debug, &cancel)
            .await?;

        let parsed = parse_response(&execution.response.text);

        let mut attempt = PreviousSolution::new(
            parsed.code.clone(),
            failures.is_empty(),
            &config.language,
            &problem.problem_statement,
        )
        .with_failures(&failures);
        if let Some(first) = failures.first() {
            attempt = attempt.with_error(format!(
                "test {} expected {}, got {}",
                first.test_id, first.expected, first.actual
            ));
        }
        self.store.record(attempt).await;

        Ok(DebugResult {
            code: parsed.code,
            analysis,
            thoughts: parsed.thoughts,
        })
    }

    fn executor(&self, config: &AppConfig) -> RequestExecutor {
        RequestExecutor::new(self.registry.clone(), self.transport.clone())
            .with_max_attempts(config.max_attempts)
    }
}

/// Parse a strict-JSON extraction response, tolerating code fences around
/// the object but nothing else.
fn parse_problem_json(text: &str) -> Result<ProblemInfo> {
    let trimmed = strip_code_fences(text);
    serde_json::from_str::<ProblemInfo>(trimmed).map_err(|e| {
        warn!(error = %e, "Extraction response was not the expected JSON");
        Error::MalformedResponse(format!("expected problem JSON: {e}"))
    })
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
