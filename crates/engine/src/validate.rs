//! Referential-integrity validation for engine configs.

use vetter_core::{ConfigError, EngineConfig};

/// Check that every tool name referenced by any mode exists in the tool
/// registry. Matching is exact and case-sensitive.
///
/// Pure function over the config value: modes are visited in key order,
/// tool names in declared order, and the first offending
/// `(tool, mode)` pair is the one reported.
pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    for (mode_name, tool_names) in &config.modes {
        for tool_name in tool_names {
            if !config.tools.contains_key(tool_name) {
                return Err(ConfigError::UnknownToolReference {
                    tool: tool_name.clone(),
                    mode: mode_name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetter_core::ToolConfig;

    #[test]
    fn test_valid_config_passes() {
        let config = EngineConfig::new("fast")
            .with_tool("ruff", ToolConfig::default())
            .with_tool("mypy", ToolConfig::default())
            .with_mode("fast", ["ruff"])
            .with_mode("comprehensive", ["ruff", "mypy"]);

        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_modes_are_valid() {
        let config = EngineConfig::new("fast").with_tool("ruff", ToolConfig::default());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_mode_list_is_valid() {
        let config = EngineConfig::new("fast").with_mode("fast", Vec::<String>::new());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_duplicate_references_are_valid() {
        let config = EngineConfig::new("fast")
            .with_tool("ruff", ToolConfig::default())
            .with_mode("fast", ["ruff", "ruff"]);

        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unreferenced_tools_are_valid() {
        let config = EngineConfig::new("fast")
            .with_tool("ruff", ToolConfig::default())
            .with_tool("bandit", ToolConfig::default())
            .with_mode("fast", ["ruff"]);

        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_reference_names_pair() {
        let config = EngineConfig::new("fast")
            .with_tool("ruff", ToolConfig::default())
            .with_mode("fast", ["ruff", "mypy"]);

        let err = validate(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownToolReference {
                tool: "mypy".to_string(),
                mode: "fast".to_string(),
            }
        );
    }

    #[test]
    fn test_casing_mismatch_fails() {
        let config = EngineConfig::new("fast")
            .with_tool("ruff", ToolConfig::default())
            .with_mode("fast", ["Ruff"]);

        let err = validate(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownToolReference {
                tool: "Ruff".to_string(),
                mode: "fast".to_string(),
            }
        );
    }

    #[test]
    fn test_first_offense_in_mode_key_order() {
        // Both modes are broken; the mode that sorts first is reported.
        let config = EngineConfig::new("fast")
            .with_mode("zeta", ["ghost-z"])
            .with_mode("alpha", ["ghost-a"]);

        let err = validate(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownToolReference {
                tool: "ghost-a".to_string(),
                mode: "alpha".to_string(),
            }
        );
    }

    #[test]
    fn test_first_offense_in_declared_tool_order() {
        let config = EngineConfig::new("fast")
            .with_tool("ruff", ToolConfig::default())
            .with_mode("fast", ["ruff", "ghost-b", "ghost-a"]);

        let err = validate(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownToolReference {
                tool: "ghost-b".to_string(),
                mode: "fast".to_string(),
            }
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let config = EngineConfig::new("fast")
            .with_mode("a", ["x"])
            .with_mode("b", ["y"]);

        let first = validate(&config).unwrap_err();
        for _ in 0..10 {
            assert_eq!(validate(&config).unwrap_err(), first);
        }
    }
}
