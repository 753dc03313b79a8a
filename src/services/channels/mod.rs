//! Channel handlers: thin parameterizations of the shared orchestration
//! shape, plus the structurally distinct voice variant.

pub mod content;
pub mod profile;
pub mod vishing;

pub use content::ContentChannelHandler;
pub use profile::{ChannelProfile, PHISHING, SMISHING, TRAINING};
pub use vishing::VishingHandler;
