//! Tool abstraction.

use async_trait::async_trait;
use std::path::PathBuf;
use vetter_core::{ToolCategory, ToolConfig, ToolError, ToolResult};

/// A pluggable analysis tool.
///
/// Finding no issues is a successful run with an empty issue list, not an
/// error; [`ToolError`] is reserved for environment and setup failures.
/// `run` must be idempotent over the file set - the only permitted side
/// effect is rewriting files when `config.auto_fix` opts in.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier, the key used throughout the config model.
    fn name(&self) -> &str;

    /// Tool classification.
    fn category(&self) -> ToolCategory {
        ToolCategory::General
    }

    /// Analyze the file set.
    async fn run(&self, files: &[PathBuf], config: &ToolConfig) -> Result<ToolResult, ToolError>;
}
