//! Pipeline-facing models: tool request/reply shapes, the upload/assign
//! state progression, per-attempt outcomes and the uniform channel result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::recommendation::{AttackMethod, Difficulty, SimulationRecommendation};
use super::target::TargetContext;

/// Structured request handed to a channel's generation tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    /// BCP-47 language tag, already normalized.
    pub language: String,
    pub method: AttackMethod,
    /// Short description of who the content targets.
    pub target_profile: String,
    /// Free-text context assembled from rationale/tactic/scenario/report.
    pub additional_context: String,
}

/// Uniform reply shape of the platform tools (generate, upload, assign).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolReply {
    pub success: bool,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ToolReply {
    /// Extract a required string field from the reply data.
    pub fn string_field(&self, field: &str) -> Option<String> {
        self.data
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }
}

/// Assignment call parameters. Group vs. user assignment is a parameter of
/// the call, not a separate code path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub resource_id: String,
    pub language_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user_resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_group_resource_id: Option<String>,
    /// Follow-up training module chained after a phishing assignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_id: Option<String>,
}

/// Progression of one piece of generated content through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Generated { content_id: String },
    Uploaded { resource_id: String, language_id: String },
    Assigned { resource_id: String },
}

impl PipelineState {
    /// Whether the content reached the terminal assigned state.
    pub fn is_assigned(&self) -> bool {
        matches!(self, PipelineState::Assigned { .. })
    }
}

/// Tri-state outcome of a single execution attempt. Drives whether the
/// strategy selector advances to the next fallback level or stops.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    Ok(T),
    Retryable(String),
    Fatal(String),
}

/// Human-actionable fallback suggestion returned when every generation
/// level has been exhausted. Derived purely from the original
/// recommendation and target; guaranteed non-empty topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedParams {
    pub topic: String,
    pub difficulty: Difficulty,
    pub method: AttackMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persuasion_tactic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub target_profile: String,
    pub suggested_action: String,
}

impl RecommendedParams {
    pub fn from_recommendation(
        rec: &SimulationRecommendation,
        target: &TargetContext,
        channel_default: AttackMethod,
    ) -> Self {
        Self {
            topic: rec.topic.clone(),
            difficulty: rec.difficulty,
            method: AttackMethod::resolve(rec.scenario_type.as_deref(), channel_default),
            persuasion_tactic: rec.persuasion_tactic.clone(),
            rationale: rec.rationale.clone(),
            target_profile: target.profile_hint(),
            suggested_action: "Create the simulation manually with these parameters".to_string(),
        }
    }
}

/// Uniform output of every channel handler. Constructed fresh per attempt
/// and never mutated after return.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw text of the conversational turn that produced the content, when
    /// the conversational path was taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_params: Option<RecommendedParams>,
}

impl PipelineResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_agent_response(mut self, text: impl Into<String>) -> Self {
        self.agent_response = Some(text.into());
        self
    }

    pub fn with_recommended_params(mut self, params: RecommendedParams) -> Self {
        self.recommended_params = Some(params);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_field_rejects_missing_and_empty() {
        let mut reply = ToolReply {
            success: true,
            ..ToolReply::default()
        };
        reply.data.insert("phishingId".into(), json!("abc-123"));
        reply.data.insert("empty".into(), json!(""));
        reply.data.insert("number".into(), json!(7));

        assert_eq!(reply.string_field("phishingId").as_deref(), Some("abc-123"));
        assert_eq!(reply.string_field("empty"), None);
        assert_eq!(reply.string_field("number"), None);
        assert_eq!(reply.string_field("absent"), None);
    }

    #[test]
    fn recommended_params_carry_the_original_topic() {
        let rec = SimulationRecommendation {
            topic: "MFA reset".into(),
            difficulty: Difficulty::Easy,
            scenario_type: Some("DATA_SUBMISSION".into()),
            persuasion_tactic: Some("fear".into()),
            rationale: None,
        };
        let params = RecommendedParams::from_recommendation(
            &rec,
            &TargetContext::user("u-1"),
            AttackMethod::ClickOnly,
        );
        assert_eq!(params.topic, "MFA reset");
        assert_eq!(params.method, AttackMethod::DataSubmission);
        assert!(!params.suggested_action.is_empty());
    }

    #[test]
    fn result_serializes_without_empty_fields() {
        let result = PipelineResult::ok("done");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(true));
        assert!(value.get("error").is_none());
        assert!(value.get("recommended_params").is_none());
    }
}
