//! Port for the stateful, memory-bearing conversational generation call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;
use crate::domain::models::SessionId;

/// One turn's reply from the conversational backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationReply {
    pub text: String,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Stateful conversational generation. The backend retains memory per
/// session id; all turns on one session id must be serialized by the
/// caller (the per-channel session scheme guarantees a single writer).
#[async_trait]
pub trait ConversationClient: Send + Sync {
    /// Send one turn and wait for the reply. Errors on backend failure.
    async fn send(&self, prompt: &str, session: &SessionId) -> DomainResult<ConversationReply>;
}
