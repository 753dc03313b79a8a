//! HTTP adapters implementing the collaborator ports against the
//! simulation platform, the conversational agent endpoint and the voice
//! gateway.
//!
//! Every adapter is constructed from an explicit [`ApiContext`]; the
//! request credential is never stored in ambient or thread-local state.

pub mod conversation;
pub mod platform;
pub mod telephony;

pub use conversation::AgentConversationClient;
pub use platform::{ChannelApiClient, PlatformDirectoryClient};
pub use telephony::VoiceGatewayClient;

use std::time::Duration;

/// Explicit per-invocation API context threaded to every adapter.
#[derive(Debug, Clone)]
pub struct ApiContext {
    pub token: String,
    pub base_url: String,
}

impl ApiContext {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Shared reqwest client with a transport-level safety net; per-call
/// deadlines are enforced by the orchestrator's `with_timeout`.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
