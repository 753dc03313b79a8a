//! Lureforge - Attack Simulation Orchestration Engine
//!
//! Lureforge generates, uploads and assigns security-awareness attack
//! simulations (phishing, smishing, training modules and vishing calls)
//! for a single target user or group, preferring deterministic tool
//! pipelines and degrading through a conversational fallback ladder when
//! they fail.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Request/report models, collaborator ports
//! - **Service Layer** (`services`): Resilience primitives, validators, the
//!   upload/assign pipeline, strategy selection and channel handlers
//! - **Application Layer** (`application`): The autonomous end-to-end service
//! - **Infrastructure Layer** (`infrastructure`): HTTP adapters, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use lureforge::application::AutonomousService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Wire adapters, build the service, run a request
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::AutonomousService;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ChannelKind, Config, PipelineResult, RunReport, SimulationRecommendation, SimulationRequest,
};
