//! Common test utilities for integration tests
//!
//! Mock collaborators and fixtures shared across the integration test
//! files. Each mock records enough of what it saw for assertions.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use lureforge::domain::errors::{DomainError, DomainResult};
use lureforge::domain::models::{
    AssignmentRequest, ChannelKind, Config, GenerationRequest, SessionId, SimulationRequest,
    TargetContext, ToolReply,
};
use lureforge::domain::ports::{
    CallConfirmation, ContentAssigner, ContentGenerator, ContentUploader, ConversationClient,
    ConversationReply, OutboundCallRequest, OutboundNumber, ResolvedTarget, TargetQuery,
    TargetResolver, TelephonyClient,
};
use lureforge::application::AutonomousService;
use lureforge::services::channels::{ContentChannelHandler, VishingHandler, PHISHING, SMISHING, TRAINING};
use lureforge::services::termination::SessionTerminator;

/// Setup test logging. Call at the beginning of tests that need output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Directory stub resolving every query to one fixed target.
pub struct StubResolver {
    pub target: TargetContext,
    pub phone: Option<String>,
    pub queries: Mutex<Vec<TargetQuery>>,
}

impl StubResolver {
    pub fn user(resource_id: &str, language: Option<&str>) -> Self {
        Self {
            target: TargetContext::User {
                resource_id: resource_id.into(),
                department: Some("Finance".into()),
                language: language.map(Into::into),
            },
            phone: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn group(resource_id: &str) -> Self {
        Self {
            target: TargetContext::Group {
                resource_id: resource_id.into(),
            },
            phone: None,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TargetResolver for StubResolver {
    async fn resolve(&self, query: &TargetQuery) -> DomainResult<ResolvedTarget> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(ResolvedTarget {
            target: self.target.clone(),
            info: serde_json::Map::new(),
            phone_number: self.phone.clone(),
            recent_activities: None,
        })
    }
}

/// Generation tool that succeeds with a fixed identifier, or fails every
/// time when `fail` is set. Counts invocations either way.
pub struct CountingGenerator {
    pub id_field: &'static str,
    pub content_id: &'static str,
    pub fail: bool,
    pub calls: AtomicU32,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl CountingGenerator {
    pub fn ok(id_field: &'static str, content_id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id_field,
            content_id,
            fail: false,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(id_field: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id_field,
            content_id: "",
            fail: true,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ContentGenerator for CountingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> DomainResult<ToolReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(DomainError::BackendFailed("generation tool offline".into()));
        }
        let mut reply = ToolReply {
            success: true,
            ..ToolReply::default()
        };
        reply.data.insert(self.id_field.into(), json!(self.content_id));
        Ok(reply)
    }
}

/// Uploader returning a fixed hosted resource; optionally flags the
/// content as QR-based.
pub struct StaticUploader {
    pub is_quishing: Option<bool>,
}

#[async_trait]
impl ContentUploader for StaticUploader {
    async fn upload(&self, _content_id: &str) -> DomainResult<ToolReply> {
        let mut reply = ToolReply {
            success: true,
            ..ToolReply::default()
        };
        reply.data.insert("resourceId".into(), json!("res-1"));
        reply.data.insert("languageId".into(), json!("lang-1"));
        if let Some(quishing) = self.is_quishing {
            reply.data.insert("isQuishing".into(), json!(quishing));
        }
        Ok(reply)
    }
}

/// Assigner recording every assignment it receives.
pub struct RecordingAssigner {
    pub seen: Mutex<Vec<AssignmentRequest>>,
}

impl RecordingAssigner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ContentAssigner for RecordingAssigner {
    async fn assign(&self, request: &AssignmentRequest) -> DomainResult<ToolReply> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(ToolReply {
            success: true,
            ..ToolReply::default()
        })
    }
}

/// Scripted conversation: replies served in order, then errors.
pub struct ScriptedConversation {
    pub replies: Mutex<Vec<DomainResult<ConversationReply>>>,
    pub prompts: Mutex<Vec<String>>,
    pub calls: AtomicU32,
}

impl ScriptedConversation {
    pub fn new(replies: Vec<DomainResult<ConversationReply>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn dead() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[allow(dead_code)]
pub fn reply(text: &str) -> DomainResult<ConversationReply> {
    Ok(ConversationReply {
        text: text.to_string(),
        reasoning: None,
    })
}

#[async_trait]
impl ConversationClient for ScriptedConversation {
    async fn send(&self, prompt: &str, _session: &SessionId) -> DomainResult<ConversationReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Err(DomainError::BackendFailed("agent unavailable".into()))
        } else {
            replies.remove(0)
        }
    }
}

/// Voice gateway with one outbound line; records placed calls.
pub struct StubTelephony {
    pub placed: Mutex<Vec<OutboundCallRequest>>,
}

impl StubTelephony {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            placed: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TelephonyClient for StubTelephony {
    async fn list_outbound_numbers(&self) -> DomainResult<Vec<OutboundNumber>> {
        Ok(vec![OutboundNumber {
            number: "+15550001111".into(),
            label: Some("primary".into()),
        }])
    }

    async fn place_call(&self, request: &OutboundCallRequest) -> DomainResult<CallConfirmation> {
        self.placed.lock().unwrap().push(request.clone());
        Ok(CallConfirmation {
            call_id: "call-42".into(),
            status: Some("queued".into()),
        })
    }
}

/// Fully wired service over the given mocks. Each content channel gets
/// its own generator so per-channel behavior can differ.
pub struct ServiceFixture {
    pub resolver: Arc<StubResolver>,
    pub phishing_generator: Arc<CountingGenerator>,
    pub smishing_generator: Arc<CountingGenerator>,
    pub training_generator: Arc<CountingGenerator>,
    pub assigner: Arc<RecordingAssigner>,
    pub conversation: Arc<ScriptedConversation>,
    pub telephony: Arc<StubTelephony>,
    pub is_quishing: Option<bool>,
}

impl ServiceFixture {
    pub fn tool_first(resolver: StubResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
            phishing_generator: CountingGenerator::ok("phishingId", "phish-1"),
            smishing_generator: CountingGenerator::ok("smishingId", "smish-1"),
            training_generator: CountingGenerator::ok("trainingId", "train-1"),
            assigner: RecordingAssigner::new(),
            conversation: ScriptedConversation::dead(),
            telephony: StubTelephony::new(),
            is_quishing: None,
        }
    }

    pub fn build(&self) -> AutonomousService {
        let config = Config::default();
        let conversation: Arc<dyn ConversationClient> = self.conversation.clone();
        let handler = |profile, generator: &Arc<CountingGenerator>| {
            ContentChannelHandler::new(
                profile,
                generator.clone(),
                Arc::new(StaticUploader {
                    is_quishing: self.is_quishing,
                }),
                self.assigner.clone(),
                conversation.clone(),
                &config,
            )
        };
        let phishing = handler(PHISHING, &self.phishing_generator);
        let smishing = handler(SMISHING, &self.smishing_generator);
        let training = handler(TRAINING, &self.training_generator);
        let vishing = VishingHandler::new(
            conversation.clone(),
            self.telephony.clone(),
            SessionTerminator::new(conversation.clone(), Duration::from_millis(200)),
            Duration::from_secs(2),
            Duration::from_secs(2),
        );
        AutonomousService::new(
            self.resolver.clone(),
            phishing,
            smishing,
            training,
            vishing,
            config,
        )
    }
}

/// A minimal valid request targeting one user by resource id.
pub fn user_request(channels: Vec<ChannelKind>) -> SimulationRequest {
    SimulationRequest {
        token: "test-token".into(),
        target_user_resource_id: Some("u-1".into()),
        channels,
        ..SimulationRequest::default()
    }
}
