//! Generic content-channel handler.
//!
//! Phishing, smishing and training are thin parameterizations of the same
//! orchestration shape; everything channel-specific lives in the
//! [`ChannelProfile`].

use std::sync::Arc;

use tracing::info;

use crate::domain::models::{
    AttackMethod, Config, GenerationRequest, PipelineResult, SessionId, SimulationRecommendation,
    TargetContext,
};
use crate::domain::ports::{
    ContentAssigner, ContentGenerator, ContentUploader, ConversationClient,
};
use crate::services::channels::profile::ChannelProfile;
use crate::services::fallback::{FallbackChain, FallbackInput};
use crate::services::pipeline::{PipelineOptions, UploadAssignPipeline};
use crate::services::strategy::ExecutionStrategySelector;
use crate::services::termination::SessionTerminator;
use crate::services::tool_first::ToolFirstGenerator;

pub struct ContentChannelHandler {
    profile: ChannelProfile,
    selector: ExecutionStrategySelector,
}

impl ContentChannelHandler {
    pub fn new(
        profile: ChannelProfile,
        generator: Arc<dyn ContentGenerator>,
        uploader: Arc<dyn ContentUploader>,
        assigner: Arc<dyn ContentAssigner>,
        conversation: Arc<dyn ConversationClient>,
        config: &Config,
    ) -> Self {
        let timeouts = &config.timeouts;
        let pipeline = Arc::new(UploadAssignPipeline::new(
            uploader,
            assigner,
            std::time::Duration::from_millis(timeouts.tool_ms),
        ));
        let tool_first = ToolFirstGenerator::new(
            generator,
            Arc::clone(&pipeline),
            std::time::Duration::from_millis(timeouts.generation_ms),
        );
        let terminator = SessionTerminator::new(
            Arc::clone(&conversation),
            std::time::Duration::from_millis(timeouts.stop_ms),
        );
        let chain = FallbackChain::new(
            conversation,
            pipeline,
            terminator,
            std::time::Duration::from_millis(timeouts.generation_ms),
        );
        Self {
            profile,
            selector: ExecutionStrategySelector::new(tool_first, chain),
        }
    }

    pub fn profile(&self) -> &ChannelProfile {
        &self.profile
    }

    /// Run this channel's pipeline end to end. Always returns a result;
    /// never errors past this boundary.
    pub async fn handle(
        &self,
        recommendation: &SimulationRecommendation,
        target: &TargetContext,
        language: &str,
        seed_report: Option<&str>,
        options: &PipelineOptions,
    ) -> PipelineResult {
        let request = GenerationRequest {
            topic: recommendation.topic.clone(),
            difficulty: recommendation.difficulty,
            language: language.to_string(),
            method: AttackMethod::resolve(
                recommendation.scenario_type.as_deref(),
                self.profile.default_method,
            ),
            target_profile: target.profile_hint(),
            additional_context: recommendation.additional_context(seed_report),
        };
        let session = SessionId::for_channel(self.profile.kind, target.resource_id());

        info!(
            channel = %self.profile.kind,
            topic = request.topic,
            session = %session,
            "dispatching content channel"
        );

        let input = FallbackInput {
            profile: &self.profile,
            recommendation,
            request: &request,
            target,
            session: &session,
            seed_report,
            options,
        };
        self.selector.run(&input).await
    }
}
