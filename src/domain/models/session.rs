//! Conversational session identifiers.
//!
//! A session id scopes the generative backend's memory to one logical
//! generation task. It is created once per autonomous-service invocation
//! per channel and passed explicitly, as a capability handle, to every
//! conversational call within that invocation. Two concurrently running
//! pipelines must never share a handle; the per-channel scheme below makes
//! that true by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ChannelKind;

/// Stable key scoping one logical generation task's conversational history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Derive the session id for one channel's run against one target,
    /// e.g. `phishing-u-42`.
    pub fn for_channel(kind: ChannelKind, target_key: &str) -> Self {
        Self(format!("{}-{}", kind.as_str(), target_key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
