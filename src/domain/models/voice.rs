//! Voice-call scenario model for the vishing channel.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Scenario driving one outbound simulated voice call. No upload/assign
/// phase exists for voice; the scenario is handed straight to telephony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VishingScenario {
    /// Who the caller pretends to be (e.g. "IT helpdesk technician").
    pub persona: String,
    /// Why they are calling.
    pub pretext: String,
    /// The first sentence spoken when the call connects.
    pub opening_line: String,
}

impl VishingScenario {
    /// All three fields are required and must be non-empty.
    pub fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("persona", &self.persona),
            ("pretext", &self.pretext),
            ("opening_line", &self.opening_line),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::ValidationFailed(format!(
                    "vishing scenario is missing required field '{field}'"
                )));
            }
        }
        Ok(())
    }
}
