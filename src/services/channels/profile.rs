//! Per-channel parameterization of the shared orchestration shape.

use crate::domain::models::{AttackMethod, ChannelKind};

/// Everything that differs between phishing, smishing and training while
/// the orchestration shape stays identical.
#[derive(Debug, Clone, Copy)]
pub struct ChannelProfile {
    pub kind: ChannelKind,
    /// Key under which the generation tool (and the conversational reply
    /// text) carries the content identifier.
    pub id_field: &'static str,
    /// Attack method used when the scenario hint resolves to neither
    /// click-only nor data-submission.
    pub default_method: AttackMethod,
    /// Human-readable label used in messages and logs.
    pub label: &'static str,
}

pub const PHISHING: ChannelProfile = ChannelProfile {
    kind: ChannelKind::Phishing,
    id_field: "phishingId",
    default_method: AttackMethod::ClickOnly,
    label: "phishing simulation",
};

pub const SMISHING: ChannelProfile = ChannelProfile {
    kind: ChannelKind::Smishing,
    id_field: "smishingId",
    default_method: AttackMethod::ClickOnly,
    label: "smishing simulation",
};

pub const TRAINING: ChannelProfile = ChannelProfile {
    kind: ChannelKind::Training,
    id_field: "trainingId",
    default_method: AttackMethod::DataSubmission,
    label: "training module",
};
