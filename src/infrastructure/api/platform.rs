//! Simulation-platform adapters: per-channel content tools and directory
//! resolution.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AssignmentRequest, ChannelKind, GenerationRequest, ToolReply};
use crate::domain::ports::{
    ContentAssigner, ContentGenerator, ContentUploader, ResolvedTarget, TargetQuery,
    TargetResolver,
};

use super::ApiContext;

/// One channel's generate/upload/assign tool surface.
pub struct ChannelApiClient {
    http: reqwest::Client,
    ctx: ApiContext,
    kind: ChannelKind,
}

impl ChannelApiClient {
    pub fn new(ctx: ApiContext, kind: ChannelKind) -> Self {
        Self {
            http: super::http_client(),
            ctx,
            kind,
        }
    }

    async fn post_tool(&self, action: &str, body: &serde_json::Value) -> DomainResult<ToolReply> {
        let url = self
            .ctx
            .endpoint(&format!("v1/simulations/{}/{action}", self.kind));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.ctx.token)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::BackendFailed(format!(
                "{action} endpoint returned {status}: {body}"
            )));
        }

        Ok(response.json::<ToolReply>().await?)
    }
}

#[async_trait]
impl ContentGenerator for ChannelApiClient {
    async fn generate(&self, request: &GenerationRequest) -> DomainResult<ToolReply> {
        self.post_tool("generate", &serde_json::to_value(request)?)
            .await
    }
}

#[async_trait]
impl ContentUploader for ChannelApiClient {
    async fn upload(&self, content_id: &str) -> DomainResult<ToolReply> {
        self.post_tool("upload", &json!({ "contentId": content_id }))
            .await
    }
}

#[async_trait]
impl ContentAssigner for ChannelApiClient {
    async fn assign(&self, request: &AssignmentRequest) -> DomainResult<ToolReply> {
        self.post_tool("assign", &serde_json::to_value(request)?)
            .await
    }
}

/// Directory lookups against the platform's user/group registry.
pub struct PlatformDirectoryClient {
    http: reqwest::Client,
    ctx: ApiContext,
}

impl PlatformDirectoryClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            http: super::http_client(),
            ctx,
        }
    }
}

#[async_trait]
impl TargetResolver for PlatformDirectoryClient {
    async fn resolve(&self, query: &TargetQuery) -> DomainResult<ResolvedTarget> {
        let url = self.ctx.endpoint("v1/directory/resolve");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.ctx.token)
            .json(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::BackendFailed(format!(
                "directory resolve returned {status}: {body}"
            )));
        }

        Ok(response.json::<ResolvedTarget>().await?)
    }
}
