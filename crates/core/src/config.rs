//! Declarative engine configuration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-tool configuration.
///
/// Immutable once an engine instance has been built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Whether the tool participates in resolved runs
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Tool-specific settings, opaque to the engine
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,

    /// Per-run deadline in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Whether the tool may rewrite files in place
    #[serde(default = "default_auto_fix")]
    pub auto_fix: bool,

    /// Re-run the tool after a fixing pass and report the second result.
    /// Off by default: one pass per invocation unless the caller opts in.
    #[serde(default)]
    pub rescan_after_fix: bool,

    /// Issue-count ceiling; exceeding it fails the invocation
    #[serde(default)]
    pub max_issues: Option<usize>,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_auto_fix() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            settings: HashMap::new(),
            timeout_seconds: 60,
            auto_fix: true,
            rescan_after_fix: false,
            max_issues: None,
        }
    }
}

impl ToolConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable the tool.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the per-run deadline.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the issue-count ceiling.
    pub fn with_max_issues(mut self, max: usize) -> Self {
        self.max_issues = Some(max);
        self
    }

    /// Set a tool-specific setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// The per-run deadline as a [`std::time::Duration`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// Engine configuration: the tool registry and the mode table.
///
/// `BTreeMap` keys keep validation's first-error identification a function
/// of the config value alone, not of hash iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Mode used when the caller does not name one
    #[serde(default)]
    pub default_mode: String,

    /// Tool registry, keyed by case-sensitive tool name
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,

    /// Named modes, each an ordered list of tool names to invoke
    #[serde(default)]
    pub modes: BTreeMap<String, Vec<String>>,
}

impl EngineConfig {
    /// Create an empty config.
    pub fn new(default_mode: impl Into<String>) -> Self {
        Self {
            default_mode: default_mode.into(),
            tools: BTreeMap::new(),
            modes: BTreeMap::new(),
        }
    }

    /// Register a tool config.
    pub fn with_tool(mut self, name: impl Into<String>, config: ToolConfig) -> Self {
        self.tools.insert(name.into(), config);
        self
    }

    /// Register a mode.
    pub fn with_mode(
        mut self,
        name: impl Into<String>,
        tools: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.modes
            .insert(name.into(), tools.into_iter().map(Into::into).collect());
        self
    }

    /// Look up a tool config by exact name.
    pub fn tool(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    /// Look up a mode's tool list by exact name.
    pub fn mode(&self, name: &str) -> Option<&[String]> {
        self.modes.get(name).map(|v| v.as_slice())
    }
}
