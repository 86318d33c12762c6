//! Generic command-backed tool adapter.

use crate::r#trait::Tool;
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use tokio::process::Command;
use vetter_core::{ToolCategory, ToolConfig, ToolError, ToolResult};

/// A tool backed by an external program.
///
/// Runs the program over the input file set and turns line-oriented output
/// into issues. Detection logic stays in the program; this adapter only
/// assembles arguments and parses lines.
pub struct CommandTool {
    name: String,
    category: ToolCategory,
    program: String,
    args: Vec<String>,
    fix_args: Option<Vec<String>>,
    issue_pattern: Option<Regex>,
}

impl CommandTool {
    /// Create an adapter for `program`, registered as `name`.
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: ToolCategory::General,
            program: program.into(),
            args: Vec::new(),
            fix_args: None,
            issue_pattern: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: ToolCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the scan argument vector.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fixing argument vector. Used instead of the scan vector
    /// when the tool config opts into auto-fix.
    pub fn with_fix_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fix_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Set a regex whose named captures become the issue fields. Output
    /// lines that do not match are dropped.
    pub fn with_issue_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.issue_pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Assemble the argument vector for one run.
    fn command_args(&self, files: &[PathBuf], config: &ToolConfig) -> Vec<String> {
        let mut args = match (&self.fix_args, config.auto_fix) {
            (Some(fix), true) => fix.clone(),
            _ => self.args.clone(),
        };

        if let Some(extra) = config.settings.get("extra_args").and_then(|v| v.as_array()) {
            args.extend(extra.iter().filter_map(|v| v.as_str().map(String::from)));
        }

        args.extend(files.iter().map(|f| f.display().to_string()));
        args
    }

    /// Parse non-empty output lines into issue objects.
    fn parse_issues(&self, output: &str) -> Vec<serde_json::Value> {
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match &self.issue_pattern {
                Some(re) => re.captures(line).map(|caps| {
                    let mut issue = serde_json::Map::new();
                    for name in re.capture_names().flatten() {
                        if let Some(m) = caps.name(name) {
                            issue.insert(name.to_string(), m.as_str().into());
                        }
                    }
                    serde_json::Value::Object(issue)
                }),
                None => Some(serde_json::json!({ "message": line })),
            })
            .collect()
    }
}

#[async_trait]
impl Tool for CommandTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ToolCategory {
        self.category
    }

    async fn run(&self, files: &[PathBuf], config: &ToolConfig) -> Result<ToolResult, ToolError> {
        let args = self.command_args(files, config);
        tracing::debug!("running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let issues = self.parse_issues(&stdout);

        // Nonzero exit without any parseable finding is an environment
        // failure, not a finding report.
        if exit_code != 0 && issues.is_empty() {
            let message = if stderr.trim().is_empty() {
                format!("'{}' exited with code {}", self.program, exit_code)
            } else {
                stderr.trim().to_string()
            };
            return Err(ToolError::Failed(message));
        }

        Ok(
            ToolResult::with_issues(self.name(), self.category, issues)
                .with_metadata("exit_code", serde_json::json!(exit_code)),
        )
    }
}
