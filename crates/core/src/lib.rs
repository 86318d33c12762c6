//! Vetter core data models.
//!
//! This crate defines the data structures shared by the quality engine:
//! declarative configuration, tool results, and aggregate outputs.

#![warn(missing_docs)]

// Core identities
mod id;

// Declarative configuration
mod config;

// Tool results and aggregate output
mod result;
mod output;

// Error taxonomy
mod error;

// Re-exports
pub use id::InvocationId;

pub use config::{EngineConfig, ToolConfig};

pub use result::{ToolCategory, ToolResult};
pub use output::{EngineOutput, FailureKind, FailureRecord, ToolOutcome};

pub use error::{ConfigError, EngineError, ToolError};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
