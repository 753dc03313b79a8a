//! Vishing (voice) channel handler.
//!
//! Structurally different from the content channels: there is no
//! deterministic tool-first path and no upload/assign phase. A call
//! scenario is generated by a single, fresh conversational call, validated,
//! then used to initiate an outbound call through the telephony provider.
//! Telephony failures are distinct, user-facing and never retried.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::models::{
    PipelineResult, SessionId, SimulationRecommendation, TargetContext, VishingScenario,
};
use crate::domain::ports::{ConversationClient, OutboundCallRequest, TelephonyClient};
use crate::services::extract_json_block;
use crate::services::resilience::with_timeout;
use crate::services::termination::SessionTerminator;

pub struct VishingHandler {
    conversation: Arc<dyn ConversationClient>,
    telephony: Arc<dyn TelephonyClient>,
    terminator: SessionTerminator,
    generation_budget: Duration,
    call_budget: Duration,
}

impl VishingHandler {
    pub fn new(
        conversation: Arc<dyn ConversationClient>,
        telephony: Arc<dyn TelephonyClient>,
        terminator: SessionTerminator,
        generation_budget: Duration,
        call_budget: Duration,
    ) -> Self {
        Self {
            conversation,
            telephony,
            terminator,
            generation_budget,
            call_budget,
        }
    }

    /// Generate a call scenario and place the call. Always returns a
    /// result; never errors past this boundary.
    pub async fn handle(
        &self,
        recommendation: &SimulationRecommendation,
        target: &TargetContext,
        destination: Option<&str>,
        language: &str,
        session: &SessionId,
    ) -> PipelineResult {
        let Some(destination) = destination else {
            return PipelineResult::failed("No phone number on record for the target");
        };
        if !crate::services::validators::is_e164(destination) {
            return PipelineResult::failed(format!(
                "Destination number '{destination}' does not satisfy E.164 format"
            ));
        }

        let (scenario, agent_response) = match self
            .generate_scenario(recommendation, target, language, session)
            .await
        {
            Ok(generated) => generated,
            Err(result) => return *result,
        };
        self.terminator.send_stop(session).await;

        let mut result = self.place_call(&scenario, destination, language).await;
        result.agent_response = Some(agent_response);
        result
    }

    /// Single non-retried generative call producing the scenario.
    async fn generate_scenario(
        &self,
        recommendation: &SimulationRecommendation,
        target: &TargetContext,
        language: &str,
        session: &SessionId,
    ) -> Result<(VishingScenario, String), Box<PipelineResult>> {
        let prompt = build_scenario_prompt(recommendation, target, language);
        let reply = match with_timeout(
            "vishing-scenario",
            self.generation_budget,
            self.conversation.send(&prompt, session),
        )
        .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "vishing scenario generation failed");
                return Err(Box::new(PipelineResult::failed(format!(
                    "Failed to generate call scenario: {err}"
                ))));
            }
        };

        let json = extract_json_block(&reply.text);
        let scenario: VishingScenario = match serde_json::from_str(&json) {
            Ok(scenario) => scenario,
            Err(err) => {
                warn!(error = %err, "vishing scenario reply was not parseable");
                return Err(Box::new(
                    PipelineResult::failed(format!("Call scenario was malformed: {err}"))
                        .with_agent_response(reply.text.clone()),
                ));
            }
        };
        if let Err(err) = scenario.validate() {
            return Err(Box::new(
                PipelineResult::failed(err.to_string()).with_agent_response(reply.text.clone()),
            ));
        }

        info!(persona = scenario.persona, "vishing scenario generated");
        Ok((scenario, reply.text))
    }

    async fn place_call(
        &self,
        scenario: &VishingScenario,
        destination: &str,
        language: &str,
    ) -> PipelineResult {
        let numbers = match with_timeout(
            "list-outbound-numbers",
            self.call_budget,
            self.telephony.list_outbound_numbers(),
        )
        .await
        {
            Ok(numbers) => numbers,
            Err(err) => return PipelineResult::failed(err.to_string()),
        };
        let Some(line) = numbers.first() else {
            return PipelineResult::failed("No outbound line configured for this account");
        };

        let request = OutboundCallRequest {
            destination: destination.to_string(),
            from_number: line.number.clone(),
            prompt: build_call_prompt(scenario, language),
            first_message: scenario.opening_line.clone(),
        };

        match with_timeout(
            "place-call",
            self.call_budget,
            self.telephony.place_call(&request),
        )
        .await
        {
            Ok(confirmation) => {
                info!(call_id = confirmation.call_id, destination, "vishing call initiated");
                let mut data = Map::new();
                data.insert("callId".into(), Value::String(confirmation.call_id));
                if let Some(status) = confirmation.status {
                    data.insert("status".into(), Value::String(status));
                }
                data.insert("fromNumber".into(), Value::String(line.number.clone()));
                PipelineResult::ok("Vishing call initiated").with_data(data)
            }
            Err(err) => PipelineResult::failed(err.to_string()),
        }
    }
}

fn build_scenario_prompt(
    recommendation: &SimulationRecommendation,
    target: &TargetContext,
    language: &str,
) -> String {
    format!(
        "Design a voice-call scenario for a security-awareness exercise.\n\
         Topic: {topic}\n\
         Difficulty: {difficulty}\n\
         Language: {language}\n\
         Target: {target}\n\
         {context}\
         Reply with a single JSON object with exactly these string fields: \
         \"persona\", \"pretext\", \"opening_line\".",
        topic = recommendation.topic,
        difficulty = recommendation.difficulty.as_str(),
        target = target.profile_hint(),
        context = {
            let ctx = recommendation.additional_context(None);
            if ctx.is_empty() {
                String::new()
            } else {
                format!("Additional context:\n{ctx}\n")
            }
        },
    )
}

fn build_call_prompt(scenario: &VishingScenario, language: &str) -> String {
    format!(
        "You are placing a simulated security-awareness call in {language}. \
         Persona: {persona}. Pretext: {pretext}. Stay in character, keep the \
         call short, and never request real credentials.",
        persona = scenario.persona,
        pretext = scenario.pretext,
    )
}
