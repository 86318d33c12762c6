//! Quality Engine
//!
//! Mode-driven orchestration of pluggable analysis tools: config
//! validation, mode resolution, and concurrent execution with isolation
//! and timeout guarantees.

#![warn(missing_docs)]

pub mod validate;
pub mod resolver;
pub mod engine;

pub use engine::{QualityEngine, QualityEngineBuilder};
pub use resolver::{ApplicabilityRule, ModeResolver, ResolvedRun};
pub use validate::validate;
