//! Upload & assignment pipeline.
//!
//! A short state machine driving both the tool-first and conversational
//! paths: `Generated(contentId)` → `Uploaded(resourceId, languageId)` →
//! `Assigned`. Upload-only requests terminate successfully at `Uploaded`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AssignmentRequest, PipelineState, TargetContext};
use crate::domain::ports::{ContentAssigner, ContentUploader};
use crate::services::resilience::with_timeout;
use crate::services::validators::is_safe_identifier;

/// Per-run pipeline options.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Stop after producing a hosted resource, without assigning it.
    pub upload_only: bool,
    /// Training module chained onto the assignment (phishing follow-up).
    pub training_id: Option<String>,
}

/// Terminal pipeline state plus the fields callers surface in results.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub state: PipelineState,
    pub resource_id: String,
    pub language_id: String,
    pub is_quishing: Option<bool>,
}

impl PipelineOutcome {
    /// Result-data entries for the channel's `PipelineResult`.
    pub fn data_entries(&self, content_id: &str) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("contentId".into(), Value::String(content_id.to_string()));
        data.insert("resourceId".into(), Value::String(self.resource_id.clone()));
        data.insert("languageId".into(), Value::String(self.language_id.clone()));
        if let Some(quishing) = self.is_quishing {
            data.insert("isQuishing".into(), Value::Bool(quishing));
        }
        data.insert("assigned".into(), Value::Bool(self.state.is_assigned()));
        data
    }
}

/// Drives generated content through upload and assignment.
pub struct UploadAssignPipeline {
    uploader: Arc<dyn ContentUploader>,
    assigner: Arc<dyn ContentAssigner>,
    tool_budget: Duration,
}

impl UploadAssignPipeline {
    pub fn new(
        uploader: Arc<dyn ContentUploader>,
        assigner: Arc<dyn ContentAssigner>,
        tool_budget: Duration,
    ) -> Self {
        Self {
            uploader,
            assigner,
            tool_budget,
        }
    }

    /// Run the full progression for one content identifier.
    ///
    /// The `Generated → Uploaded` transition requires the identifier to
    /// pass the safety grammar; the `Uploaded → Assigned` transition
    /// requires exactly one target, otherwise the pipeline halts in
    /// `Uploaded` with a "Missing target" error instead of silently
    /// no-oping.
    pub async fn run(
        &self,
        content_id: &str,
        target: Option<&TargetContext>,
        options: &PipelineOptions,
    ) -> DomainResult<PipelineOutcome> {
        if !is_safe_identifier(content_id) {
            return Err(DomainError::ValidationFailed(format!(
                "unsafe content identifier '{content_id}'"
            )));
        }

        let (resource_id, language_id, is_quishing) = self.upload(content_id).await?;

        if options.upload_only {
            info!(content_id, resource_id, "upload-only request complete");
            return Ok(PipelineOutcome {
                state: PipelineState::Uploaded {
                    resource_id: resource_id.clone(),
                    language_id: language_id.clone(),
                },
                resource_id,
                language_id,
                is_quishing,
            });
        }

        self.assign(&resource_id, &language_id, target, options)
            .await?;

        Ok(PipelineOutcome {
            state: PipelineState::Assigned {
                resource_id: resource_id.clone(),
            },
            resource_id,
            language_id,
            is_quishing,
        })
    }

    async fn upload(&self, content_id: &str) -> DomainResult<(String, String, Option<bool>)> {
        let reply = with_timeout(
            "upload",
            self.tool_budget,
            self.uploader.upload(content_id),
        )
        .await?;

        if !reply.success {
            return Err(DomainError::BackendFailed(format!(
                "upload failed: {}",
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        let resource_id = reply
            .string_field("resourceId")
            .ok_or_else(|| DomainError::MissingField {
                step: "upload".into(),
                field: "resourceId".into(),
            })?;
        let language_id = reply
            .string_field("languageId")
            .ok_or_else(|| DomainError::MissingField {
                step: "upload".into(),
                field: "languageId".into(),
            })?;

        let is_quishing = reply.data.get("isQuishing").and_then(Value::as_bool);

        info!(content_id, resource_id, language_id, "content uploaded");
        Ok((resource_id, language_id, is_quishing))
    }

    async fn assign(
        &self,
        resource_id: &str,
        language_id: &str,
        target: Option<&TargetContext>,
        options: &PipelineOptions,
    ) -> DomainResult<()> {
        let Some(target) = target else {
            return Err(DomainError::ValidationFailed(
                "Missing target: neither a user nor a group resource id is present".into(),
            ));
        };

        let request = AssignmentRequest {
            resource_id: resource_id.to_string(),
            language_id: language_id.to_string(),
            target_user_resource_id: target.user_resource_id().map(ToString::to_string),
            target_group_resource_id: target.group_resource_id().map(ToString::to_string),
            training_id: options.training_id.clone(),
        };

        let reply = with_timeout("assign", self.tool_budget, self.assigner.assign(&request))
            .await?;

        if !reply.success {
            return Err(DomainError::BackendFailed(format!(
                "assign failed: {}",
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        info!(resource_id, target = target.resource_id(), "content assigned");
        Ok(())
    }
}
