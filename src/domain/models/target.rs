//! Target of a simulation run: a single user or a whole group.

use serde::{Deserialize, Serialize};

/// Exactly one target kind per request. Both-or-neither is rejected at the
/// autonomous-service boundary before any pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetContext {
    User {
        /// Opaque platform resource identifier.
        resource_id: String,
        #[serde(default)]
        department: Option<String>,
        /// BCP-47 language tag preferred by the user.
        #[serde(default)]
        language: Option<String>,
    },
    Group {
        resource_id: String,
    },
}

impl TargetContext {
    pub fn user(resource_id: impl Into<String>) -> Self {
        Self::User {
            resource_id: resource_id.into(),
            department: None,
            language: None,
        }
    }

    pub fn group(resource_id: impl Into<String>) -> Self {
        Self::Group {
            resource_id: resource_id.into(),
        }
    }

    /// The opaque resource id, whichever kind this is.
    pub fn resource_id(&self) -> &str {
        match self {
            Self::User { resource_id, .. } | Self::Group { resource_id } => resource_id,
        }
    }

    pub fn user_resource_id(&self) -> Option<&str> {
        match self {
            Self::User { resource_id, .. } => Some(resource_id),
            Self::Group { .. } => None,
        }
    }

    pub fn group_resource_id(&self) -> Option<&str> {
        match self {
            Self::Group { resource_id } => Some(resource_id),
            Self::User { .. } => None,
        }
    }

    pub fn preferred_language(&self) -> Option<&str> {
        match self {
            Self::User { language, .. } => language.as_deref(),
            Self::Group { .. } => None,
        }
    }

    /// Short profile hint included in generation requests.
    pub fn profile_hint(&self) -> String {
        match self {
            Self::User {
                department: Some(dept),
                ..
            } => format!("single user in department {dept}"),
            Self::User { .. } => "single user".to_string(),
            Self::Group { .. } => "user group".to_string(),
        }
    }
}
