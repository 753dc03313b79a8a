//! Conversational fallback chain.
//!
//! A three-level degrade-and-retry ladder built on the stateful
//! conversational generation call. Level 1 issues the full context-rich
//! prompt (optionally after seeding the session with a prior report),
//! level 2 reissues a reduced prompt once, and level 3 never calls the
//! backend again: it returns a guaranteed, terminal result carrying
//! human-actionable parameters derived from the original recommendation.
//!
//! An upload/assign failure after a successful generation does not demote
//! to the next level; the content itself was produced, so the result is
//! reported as success with the assignment error embedded.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tracing::{info, warn};

use crate::domain::models::{
    GenerationRequest, PipelineResult, PipelineState, RecommendedParams, SessionId,
    SimulationRecommendation, TargetContext,
};
use crate::domain::ports::{ConversationClient, ConversationReply};
use crate::services::channels::profile::ChannelProfile;
use crate::services::pipeline::{PipelineOptions, UploadAssignPipeline};
use crate::services::resilience::{with_retry, with_timeout};
use crate::services::termination::SessionTerminator;
use crate::services::validators::is_safe_identifier;

/// Everything one chain invocation needs.
pub struct FallbackInput<'a> {
    pub profile: &'a ChannelProfile,
    pub recommendation: &'a SimulationRecommendation,
    pub request: &'a GenerationRequest,
    pub target: &'a TargetContext,
    pub session: &'a SessionId,
    /// Prior context (e.g. an executive report) seeded as a separate turn.
    pub seed_report: Option<&'a str>,
    pub options: &'a PipelineOptions,
}

pub struct FallbackChain {
    conversation: Arc<dyn ConversationClient>,
    pipeline: Arc<UploadAssignPipeline>,
    terminator: SessionTerminator,
    generation_budget: Duration,
}

impl FallbackChain {
    pub fn new(
        conversation: Arc<dyn ConversationClient>,
        pipeline: Arc<UploadAssignPipeline>,
        terminator: SessionTerminator,
        generation_budget: Duration,
    ) -> Self {
        Self {
            conversation,
            pipeline,
            terminator,
            generation_budget,
        }
    }

    /// Run the ladder. Always returns; never errors past this boundary.
    pub async fn run(&self, input: &FallbackInput<'_>) -> PipelineResult {
        self.seed_session(input).await;

        // Level 1: full prompt, timeout + one retry.
        let primary_prompt = build_primary_prompt(input.profile, input.request);
        let level1 = with_retry("conversational-generate", || {
            with_timeout(
                "conversational-generate",
                self.generation_budget,
                self.conversation.send(&primary_prompt, input.session),
            )
        })
        .await;

        match level1 {
            Ok(reply) => {
                if let Some(result) = self.finish_generation(input, &reply, 1).await {
                    return result;
                }
            }
            Err(err) => {
                warn!(channel = %input.profile.kind, error = %err, "primary generation failed");
            }
        }

        // Level 2: reduced prompt, timeout only, no extra retry.
        let simplified_prompt = build_simplified_prompt(input.profile, input.request);
        let level2 = with_timeout(
            "conversational-generate-simplified",
            self.generation_budget,
            self.conversation.send(&simplified_prompt, input.session),
        )
        .await;

        match level2 {
            Ok(reply) => {
                if let Some(result) = self.finish_generation(input, &reply, 2).await {
                    return result;
                }
            }
            Err(err) => {
                warn!(channel = %input.profile.kind, error = %err, "simplified generation failed");
            }
        }

        // Level 3: guaranteed terminal result, no further backend calls.
        info!(channel = %input.profile.kind, "all generation levels exhausted");
        PipelineResult::failed(format!(
            "Failed to generate {} after all fallback levels",
            input.profile.label
        ))
        .with_recommended_params(RecommendedParams::from_recommendation(
            input.recommendation,
            input.target,
            input.profile.default_method,
        ))
    }

    /// Best-effort context seeding. Failure is logged and ignored.
    async fn seed_session(&self, input: &FallbackInput<'_>) {
        let Some(report) = input.seed_report else {
            return;
        };
        let prompt = format!(
            "Background context for the upcoming task. Do not act yet, just retain it:\n{report}"
        );
        let result = with_timeout(
            "context-seed",
            self.generation_budget,
            self.conversation.send(&prompt, input.session),
        )
        .await;
        if let Err(err) = result {
            warn!(session = %input.session, error = %err, "context seeding failed, continuing without it");
        }
    }

    /// Complete one successful generation turn: extract the identifier,
    /// terminate the turn, then upload and assign.
    ///
    /// Returns `None` when this level produced no usable identifier (no id
    /// in the text, or an id failing the safety grammar), which demotes
    /// the request to the next level.
    async fn finish_generation(
        &self,
        input: &FallbackInput<'_>,
        reply: &ConversationReply,
        level: u8,
    ) -> Option<PipelineResult> {
        let Some(content_id) = extract_identifier(input.profile.id_field, &reply.text) else {
            warn!(
                channel = %input.profile.kind,
                level,
                "generation reply carried no usable identifier"
            );
            return None;
        };

        if !is_safe_identifier(&content_id) {
            warn!(
                channel = %input.profile.kind,
                level,
                content_id,
                "extracted identifier failed the safety grammar"
            );
            return None;
        }

        info!(channel = %input.profile.kind, level, content_id, "conversational generation succeeded");
        self.terminator.send_stop(input.session).await;

        match self
            .pipeline
            .run(&content_id, Some(input.target), input.options)
            .await
        {
            Ok(outcome) => {
                self.terminator.send_stop(input.session).await;
                let verb = if input.options.upload_only {
                    "generated and uploaded"
                } else {
                    "generated, uploaded and assigned"
                };
                Some(
                    PipelineResult::ok(format!(
                        "{} {verb} via conversational level {level}",
                        capitalize(input.profile.label)
                    ))
                    .with_agent_response(reply.text.clone())
                    .with_data(outcome.data_entries(&content_id)),
                )
            }
            Err(err) => {
                // Content exists even though assignment did not complete;
                // partial success is meaningful to the caller.
                warn!(channel = %input.profile.kind, error = %err, "upload/assign failed after generation");
                let state = PipelineState::Generated {
                    content_id: content_id.clone(),
                };
                let mut result = PipelineResult::ok(format!(
                    "{} generated, but upload/assignment failed",
                    capitalize(input.profile.label)
                ))
                .with_agent_response(reply.text.clone());
                result.error = Some(err.to_string());
                let mut data = serde_json::Map::new();
                data.insert(
                    "contentId".into(),
                    serde_json::Value::String(content_id),
                );
                data.insert(
                    "assigned".into(),
                    serde_json::Value::Bool(state.is_assigned()),
                );
                result.data = Some(data);
                Some(result)
            }
        }
    }
}

/// Pattern-match the content identifier out of generated text, e.g. a
/// quoted `"phishingId": "abc-123"` field.
pub fn extract_identifier(id_field: &str, text: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*"([^"]+)""#, regex::escape(id_field));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn build_primary_prompt(profile: &ChannelProfile, request: &GenerationRequest) -> String {
    format!(
        "Create a {label} for a security-awareness exercise.\n\
         Topic: {topic}\n\
         Difficulty: {difficulty}\n\
         Language: {language}\n\
         Attack method: {method}\n\
         Target: {target}\n\
         {context}\n\
         Use the available generation tools. When the content is created, \
         state its identifier in your reply exactly as \"{id_field}\": \"<id>\".",
        label = profile.label,
        topic = request.topic,
        difficulty = request.difficulty.as_str(),
        language = request.language,
        method = request.method.as_str(),
        target = request.target_profile,
        context = if request.additional_context.is_empty() {
            String::new()
        } else {
            format!("Additional context:\n{}\n", request.additional_context)
        },
        id_field = profile.id_field,
    )
}

fn build_simplified_prompt(profile: &ChannelProfile, request: &GenerationRequest) -> String {
    format!(
        "Create a simple {label} about \"{topic}\" in {language}. \
         Reply with the created content identifier as \"{id_field}\": \"<id>\".",
        label = profile.label,
        topic = request.topic,
        language = request.language,
        id_field = profile.id_field,
    )
}
