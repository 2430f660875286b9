//! Utility types.
//!
//! Configuration loading and validation, and log level handling.

pub mod config;
pub mod logging;

pub use config::SimulationConfig;
pub use logging::LogLevel;
