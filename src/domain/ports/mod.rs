//! Ports (consumed interfaces) for every external collaborator the
//! orchestration core depends on.

pub mod conversation;
pub mod directory;
pub mod telephony;
pub mod tools;

pub use conversation::{ConversationClient, ConversationReply};
pub use directory::{ResolvedTarget, TargetQuery, TargetResolver};
pub use telephony::{CallConfirmation, OutboundCallRequest, OutboundNumber, TelephonyClient};
pub use tools::{ContentAssigner, ContentGenerator, ContentUploader};
