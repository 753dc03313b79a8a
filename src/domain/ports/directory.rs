//! Port for resolving the simulation target against the platform
//! directory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::DomainResult;
use crate::domain::models::TargetContext;

/// How the caller identified the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetQuery {
    UserByResourceId {
        resource_id: String,
        department: Option<String>,
    },
    UserByName {
        first_name: String,
        last_name: String,
        department: Option<String>,
    },
    GroupByResourceId {
        resource_id: String,
    },
}

/// Directory lookup result: the normalized target plus the raw profile the
/// platform returned (surfaced as `userInfo` in the run report).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub target: TargetContext,
    #[serde(default)]
    pub info: Map<String, Value>,
    /// E.164 phone number on record, when the directory has one.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Recent simulation/training activity for the target, surfaced
    /// verbatim in the run report.
    #[serde(default)]
    pub recent_activities: Option<Value>,
}

#[async_trait]
pub trait TargetResolver: Send + Sync {
    async fn resolve(&self, query: &TargetQuery) -> DomainResult<ResolvedTarget>;
}
