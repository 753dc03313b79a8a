//! Inbound request and aggregated run report of the autonomous service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::pipeline::PipelineResult;
use super::recommendation::SimulationRecommendation;
use super::ChannelKind;

/// Inbound request at the autonomous-service boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Credential for the platform API. Threaded explicitly to every
    /// collaborator call; never stored in ambient state.
    pub token: String,

    #[serde(default)]
    pub base_api_url: Option<String>,

    // Target selection: exactly one of user-by-id, user-by-name, group.
    #[serde(default)]
    pub target_user_resource_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub target_group_resource_id: Option<String>,

    /// Channels to run, e.g. `["phishing", "training"]`.
    #[serde(default)]
    pub channels: Vec<ChannelKind>,

    /// Assign a follow-up training module after a successful phishing
    /// simulation.
    #[serde(default)]
    pub send_after_phishing_simulation: bool,

    /// Stop every content pipeline at the uploaded state without
    /// assigning it to the target.
    #[serde(default)]
    pub upload_only: bool,

    /// BCP-47 override; takes precedence over the resolved user's language.
    #[serde(default)]
    pub preferred_language: Option<String>,

    /// Executive report seeding the conversational session, when available.
    #[serde(default)]
    pub executive_report: Option<String>,

    /// Upstream analysis report, echoed back in the run report.
    #[serde(default)]
    pub analysis_report: Option<String>,

    /// What to simulate, as produced by the upstream analysis step. When
    /// absent, a generic awareness-checkup recommendation is used.
    #[serde(default)]
    pub recommendation: Option<SimulationRecommendation>,
}

/// One entry in the run's action log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub at: DateTime<Utc>,
    pub channel: Option<ChannelKind>,
    pub description: String,
}

impl ActionRecord {
    pub fn new(channel: Option<ChannelKind>, description: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            channel,
            description: description.into(),
        }
    }
}

/// Aggregated outcome of one autonomous-service invocation. Per-channel
/// results are independent; one channel's terminal failure never blocks
/// another's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Correlation id stamped on every log line of the invocation.
    pub run_id: Uuid,

    pub success: bool,

    /// Resolved target profile as returned by the directory tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_activities: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_report: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_report: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phishing_result: Option<PipelineResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_result: Option<PipelineResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smishing_result: Option<PipelineResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vishing_call_result: Option<PipelineResult>,

    pub actions: Vec<ActionRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    /// Store one channel's result in its slot. Called only after that
    /// channel's pipeline has fully resolved.
    pub fn record(&mut self, channel: ChannelKind, result: PipelineResult) {
        match channel {
            ChannelKind::Phishing => self.phishing_result = Some(result),
            ChannelKind::Training => self.training_result = Some(result),
            ChannelKind::Smishing => self.smishing_result = Some(result),
            ChannelKind::Vishing => self.vishing_call_result = Some(result),
        }
    }

    pub fn channel_result(&self, channel: ChannelKind) -> Option<&PipelineResult> {
        match channel {
            ChannelKind::Phishing => self.phishing_result.as_ref(),
            ChannelKind::Training => self.training_result.as_ref(),
            ChannelKind::Smishing => self.smishing_result.as_ref(),
            ChannelKind::Vishing => self.vishing_call_result.as_ref(),
        }
    }
}
