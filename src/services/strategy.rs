//! Execution strategy selector.
//!
//! Evaluates the available strategies in a fixed order, tool-first then
//! the conversational fallback chain, never concurrently. Every outcome
//! is normalized into a [`PipelineResult`]; nothing throws past this
//! boundary.

use tracing::{info, warn};

use crate::domain::models::{AttemptOutcome, PipelineResult};
use crate::services::fallback::{FallbackChain, FallbackInput};
use crate::services::tool_first::ToolFirstGenerator;

pub struct ExecutionStrategySelector {
    tool_first: ToolFirstGenerator,
    chain: FallbackChain,
}

impl ExecutionStrategySelector {
    pub fn new(tool_first: ToolFirstGenerator, chain: FallbackChain) -> Self {
        Self { tool_first, chain }
    }

    /// Run the preferred deterministic path; on any structural failure,
    /// discard its partial state and hand the request to the
    /// conversational chain.
    pub async fn run(&self, input: &FallbackInput<'_>) -> PipelineResult {
        let attempt = self
            .tool_first
            .run(input.profile, input.request, input.target, input.options)
            .await;

        match attempt {
            AttemptOutcome::Ok(success) => {
                info!(
                    channel = %input.profile.kind,
                    content_id = success.content_id,
                    "tool-first path completed"
                );
                let verb = if input.options.upload_only {
                    "generated and uploaded"
                } else {
                    "generated, uploaded and assigned"
                };
                PipelineResult::ok(format!(
                    "{} {verb} via deterministic tools",
                    capitalize(input.profile.label)
                ))
                .with_data(success.outcome.data_entries(&success.content_id))
            }
            AttemptOutcome::Retryable(reason) => {
                warn!(
                    channel = %input.profile.kind,
                    reason,
                    "tool-first path failed, falling back to conversational chain"
                );
                self.chain.run(input).await
            }
            AttemptOutcome::Fatal(reason) => {
                warn!(channel = %input.profile.kind, reason, "tool-first path failed fatally");
                PipelineResult::failed(reason)
            }
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
