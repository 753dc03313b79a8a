//! Deterministic tool-first generation path.
//!
//! One "generate → validate identifier → upload → assign" call sequence
//! against backend tools, with no conversational state. This is the
//! preferred, cheaper path; any structural failure demotes the request to
//! the conversational fallback chain instead of aborting it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::errors::DomainError;
use crate::domain::models::{AttemptOutcome, GenerationRequest, TargetContext};
use crate::domain::ports::ContentGenerator;
use crate::services::channels::profile::ChannelProfile;
use crate::services::pipeline::{PipelineOptions, PipelineOutcome, UploadAssignPipeline};
use crate::services::resilience::{with_retry, with_timeout};
use crate::services::validators::is_safe_identifier;

/// What a fully successful tool-first attempt produced.
#[derive(Debug, Clone)]
pub struct ToolFirstSuccess {
    pub content_id: String,
    pub outcome: PipelineOutcome,
}

pub struct ToolFirstGenerator {
    generator: Arc<dyn ContentGenerator>,
    pipeline: Arc<UploadAssignPipeline>,
    generation_budget: Duration,
}

impl ToolFirstGenerator {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        pipeline: Arc<UploadAssignPipeline>,
        generation_budget: Duration,
    ) -> Self {
        Self {
            generator,
            pipeline,
            generation_budget,
        }
    }

    /// Run the whole deterministic sequence inside one error boundary.
    ///
    /// Every failure comes back as an [`AttemptOutcome`], never as an
    /// error: `Retryable` demotes to the conversational chain, `Fatal`
    /// stops the whole request.
    pub async fn run(
        &self,
        profile: &ChannelProfile,
        request: &GenerationRequest,
        target: &TargetContext,
        options: &PipelineOptions,
    ) -> AttemptOutcome<ToolFirstSuccess> {
        let reply = match with_retry("tool-generate", || {
            with_timeout(
                "tool-generate",
                self.generation_budget,
                self.generator.generate(request),
            )
        })
        .await
        {
            Ok(reply) => reply,
            Err(err) => {
                return AttemptOutcome::Retryable(format!("generation tool call failed: {err}"))
            }
        };

        if !reply.success {
            return AttemptOutcome::Retryable(format!(
                "generation tool reported failure: {}",
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            ));
        }

        let Some(content_id) = reply.string_field(profile.id_field) else {
            return AttemptOutcome::Retryable(format!(
                "generation tool returned no '{}'",
                profile.id_field
            ));
        };

        if !is_safe_identifier(&content_id) {
            warn!(
                channel = %profile.kind,
                content_id,
                "generated identifier failed the safety grammar"
            );
            return AttemptOutcome::Retryable(format!(
                "generated identifier '{content_id}' is not safe to use"
            ));
        }

        info!(channel = %profile.kind, content_id, "tool-first generation succeeded");

        match self.pipeline.run(&content_id, Some(target), options).await {
            Ok(outcome) => AttemptOutcome::Ok(ToolFirstSuccess {
                content_id,
                outcome,
            }),
            // Missing target is a caller mistake regeneration cannot fix.
            Err(err @ DomainError::ValidationFailed(_)) => AttemptOutcome::Fatal(err.to_string()),
            Err(err) => {
                AttemptOutcome::Retryable(format!("tool-first upload/assign failed: {err}"))
            }
        }
    }
}
