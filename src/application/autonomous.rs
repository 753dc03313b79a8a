//! Autonomous service: the top-level entry point.
//!
//! Validates the inbound request, resolves the target, derives the
//! language, then dispatches the requested channels as independent
//! sequential pipelines. Per-channel results are aggregated only after
//! each pipeline has fully resolved; one channel's terminal failure never
//! prevents another from completing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::models::{
    ActionRecord, ChannelKind, Config, Difficulty, PipelineResult, RunReport, SessionId,
    SimulationRecommendation, SimulationRequest, TargetContext,
};
use crate::domain::ports::{TargetQuery, TargetResolver};
use crate::services::channels::{ContentChannelHandler, VishingHandler};
use crate::services::pipeline::PipelineOptions;
use crate::services::resilience::with_timeout;
use crate::services::validators::normalize_language_or;

pub struct AutonomousService {
    resolver: Arc<dyn TargetResolver>,
    phishing: ContentChannelHandler,
    smishing: ContentChannelHandler,
    training: ContentChannelHandler,
    vishing: VishingHandler,
    config: Config,
}

impl AutonomousService {
    pub fn new(
        resolver: Arc<dyn TargetResolver>,
        phishing: ContentChannelHandler,
        smishing: ContentChannelHandler,
        training: ContentChannelHandler,
        vishing: VishingHandler,
        config: Config,
    ) -> Self {
        Self {
            resolver,
            phishing,
            smishing,
            training,
            vishing,
            config,
        }
    }

    /// Run one invocation end to end. Always returns a report; every
    /// failure is normalized into the report shape.
    pub async fn run(&self, request: &SimulationRequest) -> RunReport {
        let mut report = RunReport {
            run_id: Uuid::new_v4(),
            ..RunReport::default()
        };
        info!(run_id = %report.run_id, "starting simulation run");

        let query = match build_target_query(request) {
            Ok(query) => query,
            Err(message) => {
                report.error = Some(message);
                return report;
            }
        };

        report.actions.push(ActionRecord::new(None, "Resolving target"));
        let resolved = match with_timeout(
            "resolve-target",
            Duration::from_millis(self.config.timeouts.tool_ms),
            self.resolver.resolve(&query),
        )
        .await
        {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(error = %err, "target resolution failed");
                report.error = Some(format!("Failed to resolve target: {err}"));
                return report;
            }
        };
        report.user_info = Some(resolved.info.clone());
        report.recent_activities = resolved.recent_activities.clone();
        report.analysis_report = request.analysis_report.clone();

        let target = resolved.target.clone();
        let language = self.derive_language(request, &target);
        let recommendation = request
            .recommendation
            .clone()
            .unwrap_or_else(|| default_recommendation(&target));
        report.executive_report = request.executive_report.clone();

        info!(
            target = target.resource_id(),
            language,
            channels = ?request.channels,
            "dispatching simulation channels"
        );

        // A training module chained after phishing must exist before the
        // phishing assignment references it, so training runs first when
        // the follow-up flag is set.
        let mut channels = dedupe(&request.channels);
        if request.send_after_phishing_simulation {
            channels.sort_by_key(|kind| match kind {
                ChannelKind::Training => 0,
                _ => 1,
            });
        }

        for kind in channels {
            let result = self
                .dispatch(
                    kind,
                    &recommendation,
                    &target,
                    &language,
                    request,
                    &resolved.phone_number,
                    &report,
                )
                .await;
            report.actions.push(ActionRecord::new(
                Some(kind),
                if result.success {
                    format!("{kind} pipeline completed")
                } else {
                    format!("{kind} pipeline failed")
                },
            ));
            report.record(kind, result);
        }

        finalize(&mut report, &request.channels);
        report
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch(
        &self,
        kind: ChannelKind,
        recommendation: &SimulationRecommendation,
        target: &TargetContext,
        language: &str,
        request: &SimulationRequest,
        phone_number: &Option<String>,
        report: &RunReport,
    ) -> PipelineResult {
        let seed_report = request.executive_report.as_deref();
        match kind {
            ChannelKind::Phishing => {
                let options = PipelineOptions {
                    upload_only: request.upload_only,
                    training_id: request
                        .send_after_phishing_simulation
                        .then(|| completed_training_content_id(report))
                        .flatten(),
                };
                self.phishing
                    .handle(recommendation, target, language, seed_report, &options)
                    .await
            }
            ChannelKind::Smishing => {
                let options = PipelineOptions {
                    upload_only: request.upload_only,
                    training_id: None,
                };
                self.smishing
                    .handle(recommendation, target, language, seed_report, &options)
                    .await
            }
            ChannelKind::Training => {
                let options = PipelineOptions {
                    upload_only: request.upload_only,
                    training_id: None,
                };
                self.training
                    .handle(recommendation, target, language, seed_report, &options)
                    .await
            }
            ChannelKind::Vishing => {
                let session = SessionId::for_channel(ChannelKind::Vishing, target.resource_id());
                self.vishing
                    .handle(
                        recommendation,
                        target,
                        phone_number.as_deref(),
                        language,
                        &session,
                    )
                    .await
            }
        }
    }

    /// Explicit override beats the resolved user's language; both fall
    /// back to the configured default when absent or malformed.
    fn derive_language(&self, request: &SimulationRequest, target: &TargetContext) -> String {
        let candidate = request
            .preferred_language
            .as_deref()
            .or_else(|| target.preferred_language());
        normalize_language_or(candidate, &self.config.default_language)
    }
}

/// Exactly one target kind per request.
fn build_target_query(request: &SimulationRequest) -> Result<TargetQuery, String> {
    let by_id = request.target_user_resource_id.as_ref();
    let by_name = request.first_name.as_ref().zip(request.last_name.as_ref());
    let by_group = request.target_group_resource_id.as_ref();

    let selected = [by_id.is_some(), by_name.is_some(), by_group.is_some()]
        .iter()
        .filter(|present| **present)
        .count();
    if selected != 1 {
        return Err(
            "Request must select exactly one target: a user resource id, a first and last name, \
             or a group resource id"
                .to_string(),
        );
    }

    Ok(if let Some(resource_id) = by_id {
        TargetQuery::UserByResourceId {
            resource_id: resource_id.clone(),
            department: request.department_name.clone(),
        }
    } else if let Some((first, last)) = by_name {
        TargetQuery::UserByName {
            first_name: first.clone(),
            last_name: last.clone(),
            department: request.department_name.clone(),
        }
    } else {
        TargetQuery::GroupByResourceId {
            resource_id: by_group.expect("one selector is present").clone(),
        }
    })
}

fn default_recommendation(target: &TargetContext) -> SimulationRecommendation {
    SimulationRecommendation {
        topic: "Security awareness checkup".to_string(),
        difficulty: Difficulty::Medium,
        scenario_type: None,
        persuasion_tactic: None,
        rationale: Some(format!(
            "No upstream recommendation supplied; running a baseline exercise for {}",
            target.profile_hint()
        )),
    }
}

fn completed_training_content_id(report: &RunReport) -> Option<String> {
    report
        .training_result
        .as_ref()
        .filter(|result| result.success)
        .and_then(|result| result.data.as_ref())
        .and_then(|data| data.get("contentId"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

fn dedupe(channels: &[ChannelKind]) -> Vec<ChannelKind> {
    let mut seen = Vec::new();
    for kind in channels {
        if !seen.contains(kind) {
            seen.push(*kind);
        }
    }
    seen
}

fn finalize(report: &mut RunReport, requested: &[ChannelKind]) {
    let mut total = 0usize;
    let mut failures = 0usize;
    for kind in dedupe(requested) {
        if let Some(result) = report.channel_result(kind) {
            total += 1;
            if !result.success {
                failures += 1;
            }
        }
    }

    report.success = failures == 0;
    report.message = Some(if requested.is_empty() {
        "No channels requested".to_string()
    } else if failures == 0 {
        format!("All {total} requested channel(s) completed")
    } else {
        format!("{failures} of {total} requested channel(s) failed")
    });
}
