//! Channel-agnostic description of what to generate.
//!
//! A [`SimulationRecommendation`] is produced upstream by a
//! recommendation/analysis step and treated as immutable once it is handed
//! to a channel handler.

use serde::{Deserialize, Serialize};

/// Normalized difficulty of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// How the simulated attack expects the target to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackMethod {
    #[serde(rename = "Click-Only")]
    ClickOnly,
    #[serde(rename = "Data-Submission")]
    DataSubmission,
}

impl AttackMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClickOnly => "Click-Only",
            Self::DataSubmission => "Data-Submission",
        }
    }

    /// Resolve an attack method from a free-form scenario-type hint.
    ///
    /// Hints containing `CLICK` map to click-only; `DATA` or `SUBMISSION`
    /// map to data-submission; anything else falls back to the channel's
    /// default.
    pub fn resolve(scenario_type: Option<&str>, channel_default: Self) -> Self {
        let Some(hint) = scenario_type else {
            return channel_default;
        };
        let upper = hint.to_ascii_uppercase();
        if upper.contains("CLICK") {
            Self::ClickOnly
        } else if upper.contains("DATA") || upper.contains("SUBMISSION") {
            Self::DataSubmission
        } else {
            channel_default
        }
    }
}

/// What an upstream analysis step recommends simulating for a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRecommendation {
    /// Topic or title of the simulation (e.g. "Payroll update notice").
    pub topic: String,

    /// Normalized difficulty level.
    #[serde(default)]
    pub difficulty: Difficulty,

    /// Free-form scenario/attack-method hint (e.g. "DATA_SUBMISSION").
    #[serde(default)]
    pub scenario_type: Option<String>,

    /// Persuasion tactic to lean on (e.g. "urgency", "authority").
    #[serde(default)]
    pub persuasion_tactic: Option<String>,

    /// Free-text rationale from the analysis step.
    #[serde(default)]
    pub rationale: Option<String>,
}

impl SimulationRecommendation {
    /// Assemble the free-text context block passed to generation, from the
    /// rationale, tactic, scenario hint and any caller-supplied report.
    pub fn additional_context(&self, report: Option<&str>) -> String {
        let mut parts = Vec::new();
        if let Some(rationale) = &self.rationale {
            parts.push(format!("Rationale: {rationale}"));
        }
        if let Some(tactic) = &self.persuasion_tactic {
            parts.push(format!("Persuasion tactic: {tactic}"));
        }
        if let Some(scenario) = &self.scenario_type {
            parts.push(format!("Scenario type: {scenario}"));
        }
        if let Some(report) = report {
            parts.push(format!("Report context: {report}"));
        }
        parts.join("\n")
    }
}
