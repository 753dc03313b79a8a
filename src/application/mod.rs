//! Application layer: top-level use-case orchestration.

pub mod autonomous;

pub use autonomous::AutonomousService;
