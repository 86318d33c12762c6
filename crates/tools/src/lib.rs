//! Tool Integration
//!
//! The pluggable tool contract, the name-keyed registry, and a generic
//! command-backed adapter.

#![warn(missing_docs)]

pub mod r#trait;
pub mod registry;
pub mod command;

pub use r#trait::Tool;
pub use registry::ToolRegistry;
pub use command::CommandTool;
