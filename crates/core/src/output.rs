//! Aggregate output of one engine invocation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::id::InvocationId;
use crate::result::ToolResult;
use crate::Time;

/// Why a tool produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The tool raised an execution error
    Error,
    /// The tool exceeded its deadline
    Timeout,
    /// The invocation was aborted before the tool finished
    Cancelled,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Error => "error",
            FailureKind::Timeout => "timeout",
            FailureKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Substituted into the summary in place of a result when a tool fails.
///
/// A failure record never aborts the run; it is the only way a caller
/// learns of a per-tool failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Name of the tool that failed
    pub tool_name: String,

    /// Failure classification
    pub error_kind: FailureKind,

    /// Human-readable description
    pub message: String,
}

impl FailureRecord {
    /// Create a failure record.
    pub fn new(
        tool_name: impl Into<String>,
        error_kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            error_kind,
            message: message.into(),
        }
    }
}

/// What one resolved tool contributed to the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool ran to completion
    Completed(ToolResult),
    /// The tool errored, timed out, or was cancelled
    Failed(FailureRecord),
}

impl ToolOutcome {
    /// The result, if the tool completed.
    pub fn result(&self) -> Option<&ToolResult> {
        match self {
            ToolOutcome::Completed(result) => Some(result),
            ToolOutcome::Failed(_) => None,
        }
    }

    /// The failure record, if the tool failed.
    pub fn failure(&self) -> Option<&FailureRecord> {
        match self {
            ToolOutcome::Completed(_) => None,
            ToolOutcome::Failed(record) => Some(record),
        }
    }

    /// Whether this entry is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, ToolOutcome::Failed(_))
    }
}

/// Terminal artifact of one invocation. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOutput {
    /// Invocation identity
    pub invocation_id: InvocationId,

    /// Mode the invocation was resolved under
    pub mode: String,

    /// True iff no tool failed and no issue ceiling was exceeded
    pub success: bool,

    /// One entry per resolved tool, keyed by tool name
    pub summary: HashMap<String, ToolOutcome>,

    /// Sum of issue counts over completed entries
    pub aggregated_issue_count: usize,

    /// When the invocation started
    pub started_at: Time,

    /// Wall-clock time from resolution to merge
    pub duration: std::time::Duration,
}

impl EngineOutput {
    /// Failure records in the summary, in no particular order.
    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.summary.values().filter_map(|o| o.failure())
    }

    /// Completed results in the summary, in no particular order.
    pub fn results(&self) -> impl Iterator<Item = &ToolResult> {
        self.summary.values().filter_map(|o| o.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ToolCategory;

    #[test]
    fn test_outcome_accessors() {
        let completed = ToolOutcome::Completed(ToolResult::new("ruff", ToolCategory::Linting));
        assert!(completed.result().is_some());
        assert!(completed.failure().is_none());
        assert!(!completed.is_failure());

        let failed = ToolOutcome::Failed(FailureRecord::new(
            "mypy",
            FailureKind::Timeout,
            "deadline exceeded",
        ));
        assert!(failed.result().is_none());
        assert_eq!(failed.failure().unwrap().error_kind, FailureKind::Timeout);
        assert!(failed.is_failure());
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Error.to_string(), "error");
        assert_eq!(FailureKind::Timeout.to_string(), "timeout");
        assert_eq!(FailureKind::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_output_iterators() {
        let mut summary = HashMap::new();
        summary.insert(
            "ruff".to_string(),
            ToolOutcome::Completed(ToolResult::new("ruff", ToolCategory::Linting)),
        );
        summary.insert(
            "mypy".to_string(),
            ToolOutcome::Failed(FailureRecord::new("mypy", FailureKind::Error, "boom")),
        );

        let output = EngineOutput {
            invocation_id: InvocationId::new(),
            mode: "fast".to_string(),
            success: false,
            summary,
            aggregated_issue_count: 0,
            started_at: chrono::Utc::now(),
            duration: std::time::Duration::ZERO,
        };

        assert_eq!(output.results().count(), 1);
        assert_eq!(output.failures().count(), 1);
    }

    #[test]
    fn test_outcome_serde_tag() {
        let outcome = ToolOutcome::Failed(FailureRecord::new("mypy", FailureKind::Cancelled, ""));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["error_kind"], "cancelled");
    }
}
