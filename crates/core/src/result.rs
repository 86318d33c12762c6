//! Tool results - the wrapper that erases tool-specific issue shapes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tool classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
    /// Style and lint rules
    Linting,
    /// Source formatting
    Formatting,
    /// Static type checking
    Types,
    /// Vulnerability and secret scanning
    Security,
    /// Doc coverage and doc style
    Documentation,
    /// Test execution and coverage
    Testing,
    /// AI-based review
    Ai,
    /// Anything else
    #[default]
    General,
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ToolCategory::Linting => "linting",
            ToolCategory::Formatting => "formatting",
            ToolCategory::Types => "types",
            ToolCategory::Security => "security",
            ToolCategory::Documentation => "documentation",
            ToolCategory::Testing => "testing",
            ToolCategory::Ai => "ai",
            ToolCategory::General => "general",
        };
        f.write_str(s)
    }
}

/// Result of one tool run.
///
/// Issues keep whatever shape the tool gave them; the engine only ever
/// counts them. Issues are fixed at construction - there is no mutable
/// access after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that produced this result
    pub tool_name: String,

    /// Tool classification
    pub category: ToolCategory,

    issues: Vec<serde_json::Value>,

    /// Tool-defined extras (versions, durations, fix counts)
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a clean result with no issues.
    pub fn new(tool_name: impl Into<String>, category: ToolCategory) -> Self {
        Self {
            tool_name: tool_name.into(),
            category,
            issues: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Create a result from the tool's own issue type.
    ///
    /// Adapters declare their issue type here; it is serialized into the
    /// opaque payload once, at construction.
    pub fn with_issues<T: Serialize>(
        tool_name: impl Into<String>,
        category: ToolCategory,
        issues: impl IntoIterator<Item = T>,
    ) -> Self {
        let issues = issues
            .into_iter()
            .filter_map(|issue| serde_json::to_value(issue).ok())
            .collect();

        Self {
            tool_name: tool_name.into(),
            category,
            issues,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// The issues, in the shape the tool reported them.
    pub fn issues(&self) -> &[serde_json::Value] {
        &self.issues
    }

    /// Number of issues found.
    pub fn count(&self) -> usize {
        self.issues.len()
    }

    /// Whether the tool found anything.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct LintIssue {
        file: String,
        line: u32,
        message: String,
    }

    #[test]
    fn test_clean_result() {
        let result = ToolResult::new("ruff", ToolCategory::Linting);
        assert_eq!(result.count(), 0);
        assert!(!result.has_issues());
        assert_eq!(result.tool_name, "ruff");
    }

    #[test]
    fn test_typed_issues_are_erased() {
        let result = ToolResult::with_issues(
            "ruff",
            ToolCategory::Linting,
            vec![
                LintIssue {
                    file: "main.py".into(),
                    line: 3,
                    message: "unused import".into(),
                },
                LintIssue {
                    file: "main.py".into(),
                    line: 9,
                    message: "line too long".into(),
                },
            ],
        );

        assert_eq!(result.count(), 2);
        assert!(result.has_issues());
        assert_eq!(result.issues()[0]["line"], 3);
    }

    #[test]
    fn test_count_tracks_issues() {
        let result =
            ToolResult::with_issues("bandit", ToolCategory::Security, vec![serde_json::json!({})]);
        assert_eq!(result.count(), result.issues().len());
    }

    #[test]
    fn test_metadata_builder() {
        let result = ToolResult::new("mypy", ToolCategory::Types)
            .with_metadata("version", serde_json::json!("1.8.0"));
        assert_eq!(result.metadata["version"], "1.8.0");
    }

    #[test]
    fn test_default_category() {
        assert_eq!(ToolCategory::default(), ToolCategory::General);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ToolCategory::Linting.to_string(), "linting");
        assert_eq!(ToolCategory::Ai.to_string(), "ai");
    }
}
