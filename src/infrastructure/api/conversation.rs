//! Adapter for the stateful conversational agent endpoint.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SessionId;
use crate::domain::ports::{ConversationClient, ConversationReply};

use super::ApiContext;

pub struct AgentConversationClient {
    http: reqwest::Client,
    ctx: ApiContext,
}

impl AgentConversationClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            http: super::http_client(),
            ctx,
        }
    }
}

#[async_trait]
impl ConversationClient for AgentConversationClient {
    async fn send(&self, prompt: &str, session: &SessionId) -> DomainResult<ConversationReply> {
        let url = self.ctx.endpoint("v1/agent/messages");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.ctx.token)
            .json(&json!({
                "sessionId": session.as_str(),
                "prompt": prompt,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::BackendFailed(format!(
                "agent endpoint returned {status}: {body}"
            )));
        }

        let reply: ConversationReply = response.json().await?;
        if reply.text.is_empty() {
            return Err(DomainError::BackendFailed(
                "agent returned no text content".into(),
            ));
        }
        Ok(reply)
    }
}
