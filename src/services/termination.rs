//! Session termination protocol.
//!
//! Conversational backends may keep invoking tools or producing content
//! after their assigned task is done, corrupting session state for any
//! later turn on the same thread. After each successful generation turn
//! and after a successful upload-and-assign turn, the orchestrator sends
//! one explicit stop instruction into the same session. This is a
//! compensating control, not a guarantee: delivery is best-effort with a
//! short deadline, and failure never fails the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::models::SessionId;
use crate::domain::ports::ConversationClient;
use crate::services::resilience::with_timeout;

const STOP_INSTRUCTION: &str = "Your task is complete. Stop now: do not invoke any further tools, \
     generate additional content, or take any other action in this conversation.";

pub struct SessionTerminator {
    conversation: Arc<dyn ConversationClient>,
    budget: Duration,
}

impl SessionTerminator {
    pub fn new(conversation: Arc<dyn ConversationClient>, budget: Duration) -> Self {
        Self {
            conversation,
            budget,
        }
    }

    /// Deliver the stop instruction. Never propagates failure.
    pub async fn send_stop(&self, session: &SessionId) {
        let result = with_timeout(
            "stop-message",
            self.budget,
            self.conversation.send(STOP_INSTRUCTION, session),
        )
        .await;

        match result {
            Ok(_) => debug!(session = %session, "stop instruction delivered"),
            Err(err) => warn!(
                session = %session,
                error = %err,
                "failed to deliver stop instruction; session may continue acting"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{DomainError, DomainResult};
    use crate::domain::models::ChannelKind;
    use crate::domain::ports::ConversationReply;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FailingConversation {
        calls: AtomicU32,
    }

    #[async_trait]
    impl ConversationClient for FailingConversation {
        async fn send(&self, _prompt: &str, _session: &SessionId) -> DomainResult<ConversationReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::BackendFailed("agent unreachable".into()))
        }
    }

    #[tokio::test]
    async fn stop_failure_is_swallowed() {
        let conversation = Arc::new(FailingConversation {
            calls: AtomicU32::new(0),
        });
        let terminator = SessionTerminator::new(
            Arc::clone(&conversation) as Arc<dyn ConversationClient>,
            Duration::from_millis(100),
        );
        let session = SessionId::for_channel(ChannelKind::Phishing, "u-1");

        // Must return () even though the backend errored.
        terminator.send_stop(&session).await;
        assert_eq!(conversation.calls.load(Ordering::SeqCst), 1);
    }
}
