//! Port for the outbound-call telephony provider used by vishing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;

/// An outbound line available for placing calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundNumber {
    pub number: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Request to place one simulated call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundCallRequest {
    /// E.164 destination, validated before this request is built.
    pub destination: String,
    /// Line to call from, chosen from `list_outbound_numbers`.
    pub from_number: String,
    /// Full conversational prompt driving the call agent.
    pub prompt: String,
    /// First message spoken when the call connects.
    pub first_message: String,
}

/// Confirmation of an initiated call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallConfirmation {
    pub call_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[async_trait]
pub trait TelephonyClient: Send + Sync {
    /// List lines available for outbound calls. An empty list means no
    /// outbound line is configured for this account.
    async fn list_outbound_numbers(&self) -> DomainResult<Vec<OutboundNumber>>;

    async fn place_call(&self, request: &OutboundCallRequest) -> DomainResult<CallConfirmation>;
}
