//! Tool registry.

use crate::r#trait::Tool;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of tool implementations, keyed by tool name.
///
/// Populated explicitly at engine construction; read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its own name. A later registration under the
    /// same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!("tool '{}' registered twice, keeping the latest", name);
        }
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Whether a tool is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use vetter_core::{ToolCategory, ToolConfig, ToolError, ToolResult};

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(
            &self,
            _files: &[PathBuf],
            _config: &ToolConfig,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::new(self.0, ToolCategory::General))
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("ruff")));

        assert!(registry.contains("ruff"));
        assert_eq!(registry.get("ruff").unwrap().name(), "ruff");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("ruff")));

        assert!(registry.get("Ruff").is_none());
    }

    #[test]
    fn test_duplicate_registration_keeps_latest() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("ruff")));
        registry.register(Arc::new(NamedTool("ruff")));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("mypy")));
        registry.register(Arc::new(NamedTool("bandit")));

        assert_eq!(registry.names(), vec!["bandit", "mypy"]);
        assert!(!registry.is_empty());
    }
}
