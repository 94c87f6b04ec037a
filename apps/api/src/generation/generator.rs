//! Generation loop: draft, validate, and redraft with explicit feedback.
//!
//! Flow: parse history once → up to `max_attempts` × (prompt → generator → JSON → pipeline).
//! The loop stops at the first attempt with no regeneration-required errors. Generator or
//! parse failures on earlier attempts are absorbed; on the final attempt they propagate.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::profile::derive_profile;
use crate::generation::prompts::with_corrections;
use crate::history::models::{HistoryParseResult, PositionRecord};
use crate::history::parser::parse_history;
use crate::llm_client::{
    extract_json_object, strip_code_fences, Generator, GeneratorOptions, GeneratorRequest, LlmError,
};
use crate::validation::config::ValidationConfig;
use crate::validation::issues::ValidationResult;
use crate::validation::models::{
    CandidateProfile, GeneratedContent, KeywordIntents, TargetDescription,
};
use crate::validation::pipeline::{Pipeline, ValidationInput};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator call failed: {0}")]
    Generator(#[from] LlmError),

    #[error("No JSON found in response")]
    NoJsonFound,

    #[error("generator output is not valid content JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// One drafting job.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub model: String,
    /// Used verbatim on the first attempt.
    pub base_prompt: String,
    /// Raw career history; parsed once before the first attempt.
    pub history_text: String,
    pub target: TargetDescription,
    pub keywords: KeywordIntents,
    pub limitations: Vec<String>,
    pub options: GeneratorOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub run_id: Uuid,
    /// Corrected content of the last attempt that produced output.
    pub content: GeneratedContent,
    pub validation_result: ValidationResult,
    pub attempts: u32,
    pub success: bool,
    pub reference_history: HistoryParseResult,
}

/// Loop settings. The pipeline defaults to the standard one.
#[derive(Debug, Clone)]
pub struct GenerationLoop {
    pipeline: Pipeline,
    config: ValidationConfig,
    max_attempts: u32,
}

impl GenerationLoop {
    pub fn new(config: ValidationConfig, max_attempts: u32) -> Self {
        Self {
            pipeline: Pipeline::standard(),
            config,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub async fn run(
        &self,
        generator: &dyn Generator,
        job: &GenerationJob,
    ) -> Result<GenerationOutcome, GenerationError> {
        let run_id = Uuid::new_v4();
        info!(%run_id, backend = generator.backend(), model = %job.model, "Starting generation");

        // Stable ground truth for every attempt.
        let reference_history = parse_history(Some(generator), &job.model, &job.history_text).await;
        if reference_history.is_degraded() {
            warn!(%run_id, errors = ?reference_history.errors, "No reference history, validation will be bypassed");
        }
        let profile = derive_profile(&reference_history.positions, self.config.reference_year);

        let mut previous: Option<ValidationResult> = None;

        for attempt in 1..self.max_attempts {
            let prompt = self.prompt_for(job, previous.as_ref());
            info!(%run_id, attempt, max_attempts = self.max_attempts, "Generation attempt");

            match self
                .attempt(generator, job, &prompt, &reference_history.positions, &profile)
                .await
            {
                Ok(result) if !result.needs_regeneration() => {
                    info!(%run_id, attempts = attempt, "Generation passed validation");
                    return Ok(self.outcome(run_id, result, attempt, reference_history));
                }
                Ok(result) => {
                    warn!(
                        %run_id,
                        attempt,
                        errors = result.regeneration_errors().count(),
                        "Attempt failed validation, regenerating"
                    );
                    previous = Some(result);
                }
                Err(e) => warn!(%run_id, attempt, error = %e, "Attempt failed, retrying"),
            }
        }

        let attempt = self.max_attempts;
        let prompt = self.prompt_for(job, previous.as_ref());
        info!(%run_id, attempt, max_attempts = self.max_attempts, "Generation attempt");
        let result = self
            .attempt(generator, job, &prompt, &reference_history.positions, &profile)
            .await?;

        let outcome = self.outcome(run_id, result, attempt, reference_history);
        if outcome.success {
            info!(%run_id, attempts = attempt, "Generation passed validation");
        } else {
            warn!(
                %run_id,
                attempts = attempt,
                errors = outcome.validation_result.regeneration_errors().count(),
                "Generation exhausted attempts, returning degraded content"
            );
        }
        Ok(outcome)
    }

    fn prompt_for(&self, job: &GenerationJob, previous: Option<&ValidationResult>) -> String {
        match previous {
            Some(result) => with_corrections(&job.base_prompt, result),
            None => job.base_prompt.clone(),
        }
    }

    async fn attempt(
        &self,
        generator: &dyn Generator,
        job: &GenerationJob,
        prompt: &str,
        history: &[PositionRecord],
        profile: &CandidateProfile,
    ) -> Result<ValidationResult, GenerationError> {
        let request = GeneratorRequest {
            model: job.model.clone(),
            prompt: prompt.to_string(),
            options: job.options,
        };
        let text = generator.complete(&request).await?;
        let content = parse_generated(&text)?;

        let input = ValidationInput {
            content: &content,
            history,
            target: &job.target,
            keywords: &job.keywords,
            limitations: &job.limitations,
            profile,
        };
        Ok(self.pipeline.run(&input, &self.config))
    }

    fn outcome(
        &self,
        run_id: Uuid,
        result: ValidationResult,
        attempts: u32,
        reference_history: HistoryParseResult,
    ) -> GenerationOutcome {
        GenerationOutcome {
            run_id,
            content: result.corrected_content.clone(),
            success: !result.needs_regeneration(),
            validation_result: result,
            attempts,
            reference_history,
        }
    }
}

/// Strips code fences and parses the outermost `{...}` span.
pub fn parse_generated(text: &str) -> Result<GeneratedContent, GenerationError> {
    let cleaned = strip_code_fences(text);
    let object = extract_json_object(&cleaned).ok_or(GenerationError::NoJsonFound)?;
    Ok(serde_json::from_str(object)?)
}

/// Runs the standard loop.
pub async fn generate(
    generator: &dyn Generator,
    job: &GenerationJob,
    config: &ValidationConfig,
    max_attempts: u32,
) -> Result<GenerationOutcome, GenerationError> {
    GenerationLoop::new(config.clone(), max_attempts)
        .run(generator, job)
        .await
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
