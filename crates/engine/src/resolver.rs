//! Mode resolution - turning (mode, files) into a concrete tool list.

use std::collections::HashSet;
use std::path::PathBuf;
use vetter_core::{EngineConfig, EngineError};

/// File-set predicate for adding a tool in the adaptive mode.
///
/// Rules are resolver data: a new tool registers its own rule instead of
/// the resolver growing a branch per tool.
#[derive(Debug, Clone)]
pub struct ApplicabilityRule {
    tool: String,
    extensions: Vec<String>,
}

impl ApplicabilityRule {
    /// Add `tool` when any input file carries one of `extensions`.
    pub fn new(
        tool: impl Into<String>,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            tool: tool.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// The tool this rule adds.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Whether the file set triggers this rule.
    pub fn matches(&self, files: &[PathBuf]) -> bool {
        files
            .iter()
            .filter_map(|f| f.extension().and_then(|e| e.to_str()))
            .any(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// The concrete, ordered set of distinct tools selected for one
/// invocation. Ephemeral - created per invocation, discarded after.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    /// Mode the run was resolved under
    pub mode: String,

    /// Distinct tool names, first-occurrence order
    pub tools: Vec<String>,
}

impl ResolvedRun {
    /// Number of tools to execute.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the run selects no tools at all.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Resolves a requested mode against an engine config.
#[derive(Debug, Clone)]
pub struct ModeResolver {
    smart_mode: String,
    base_mode: String,
    rules: Vec<ApplicabilityRule>,
}

impl Default for ModeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeResolver {
    /// Create a resolver with the default mode names ("smart" adaptive
    /// mode on a "fast" baseline) and no rules.
    pub fn new() -> Self {
        Self {
            smart_mode: "smart".to_string(),
            base_mode: "fast".to_string(),
            rules: Vec::new(),
        }
    }

    /// Rename the adaptive mode.
    pub fn with_smart_mode(mut self, name: impl Into<String>) -> Self {
        self.smart_mode = name.into();
        self
    }

    /// Set the baseline mode the adaptive mode starts from.
    pub fn with_base_mode(mut self, name: impl Into<String>) -> Self {
        self.base_mode = name.into();
        self
    }

    /// Register an applicability rule. Rule order is append order.
    pub fn with_rule(mut self, rule: ApplicabilityRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Compute the tool list for `mode` over `files`.
    ///
    /// Named modes resolve from the config's mode table; the adaptive
    /// mode starts from the baseline list (empty when the baseline mode
    /// is absent) and appends each rule's tool when its predicate
    /// matches. Disabled tools are excluded and duplicates collapse to
    /// their first occurrence. The only error is an unknown mode name.
    pub fn resolve(
        &self,
        config: &EngineConfig,
        mode: &str,
        files: &[PathBuf],
    ) -> Result<ResolvedRun, EngineError> {
        let names: Vec<String> = if mode == self.smart_mode {
            let mut names = config
                .mode(&self.base_mode)
                .map(|tools| tools.to_vec())
                .unwrap_or_default();

            for rule in &self.rules {
                if !rule.matches(files) {
                    continue;
                }
                if config.tool(rule.tool()).is_none() {
                    tracing::debug!("rule tool '{}' not configured, skipping", rule.tool());
                    continue;
                }
                names.push(rule.tool().to_string());
            }
            names
        } else {
            config
                .mode(mode)
                .ok_or_else(|| EngineError::UnknownMode(mode.to_string()))?
                .to_vec()
        };

        let mut seen = HashSet::new();
        let tools = names
            .into_iter()
            .filter(|name| {
                let enabled = config.tool(name).map(|t| t.enabled).unwrap_or(true);
                enabled && seen.insert(name.clone())
            })
            .collect();

        Ok(ResolvedRun {
            mode: mode.to_string(),
            tools,
        })
    }
}
