//! Infrastructure layer: HTTP adapters for the simulation platform, the
//! conversational agent gateway, the voice gateway, configuration loading
//! and logging setup.

pub mod api;
pub mod config;
pub mod logging;
