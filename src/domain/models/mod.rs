//! Domain models: pure data, no I/O.

pub mod config;
pub mod pipeline;
pub mod recommendation;
pub mod report;
pub mod session;
pub mod target;
pub mod voice;

use serde::{Deserialize, Serialize};

pub use config::{ApiConfig, Config, LoggingConfig, TimeoutConfig};
pub use pipeline::{
    AssignmentRequest, AttemptOutcome, GenerationRequest, PipelineResult, PipelineState,
    RecommendedParams, ToolReply,
};
pub use recommendation::{AttackMethod, Difficulty, SimulationRecommendation};
pub use report::{ActionRecord, RunReport, SimulationRequest};
pub use session::SessionId;
pub use target::TargetContext;
pub use voice::VishingScenario;

/// One content category with its own tooling but a shared orchestration
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    #[serde(rename = "phishing")]
    Phishing,
    #[serde(rename = "smishing")]
    Smishing,
    #[serde(rename = "training")]
    Training,
    #[serde(rename = "vishing-call")]
    Vishing,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phishing => "phishing",
            Self::Smishing => "smishing",
            Self::Training => "training",
            Self::Vishing => "vishing-call",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
