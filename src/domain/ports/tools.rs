//! Deterministic platform tool ports: generate, upload, assign.
//!
//! One trait per concern so channel handlers can be parameterized with
//! exactly the tools their channel supports. Implementations live in
//! `infrastructure::api` and carry the request credential explicitly.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AssignmentRequest, GenerationRequest, ToolReply};

/// Invokes a channel's deterministic content-generation tool.
///
/// The reply's `data` carries the generated content identifier under a
/// channel-specific key (e.g. `phishingId`).
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> DomainResult<ToolReply>;
}

/// Uploads generated content, producing a hosted resource.
///
/// Reply data: `resourceId`, `languageId`, optional `isQuishing`.
#[async_trait]
pub trait ContentUploader: Send + Sync {
    async fn upload(&self, content_id: &str) -> DomainResult<ToolReply>;
}

/// Assigns an uploaded resource to a user or group.
#[async_trait]
pub trait ContentAssigner: Send + Sync {
    async fn assign(&self, request: &AssignmentRequest) -> DomainResult<ToolReply>;
}
