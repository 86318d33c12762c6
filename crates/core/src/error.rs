//! Error taxonomy for the quality engine.

use thiserror::Error;

/// Configuration-time errors. Fatal to engine construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A mode references a tool name absent from the tool registry.
    /// Names the first offending pair in iteration order.
    #[error("mode '{mode}' references unknown tool '{tool}'")]
    UnknownToolReference {
        /// Tool name the mode referenced
        tool: String,
        /// Mode containing the reference
        mode: String,
    },
}

/// Invocation-time errors. Fatal to that invocation only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The requested mode does not exist
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Construction-time configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Environment and setup failures raised by a tool's `run`.
///
/// "No issues found" is a successful run, never an error. The
/// orchestrator downgrades these to failure records; they do not escape
/// `execute`.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool's binary could not be started
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error while running the tool
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tool was invoked with input it cannot process
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tool ran but could not produce a result
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_pair() {
        let err = ConfigError::UnknownToolReference {
            tool: "Ruff".to_string(),
            mode: "fast".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Ruff"));
        assert!(msg.contains("fast"));
    }

    #[test]
    fn test_unknown_mode_message() {
        let err = EngineError::UnknownMode("turbo".to_string());
        assert_eq!(err.to_string(), "unknown mode: turbo");
    }

    #[test]
    fn test_config_error_converts() {
        let err: EngineError = ConfigError::UnknownToolReference {
            tool: "t".to_string(),
            mode: "m".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_spawn_error_names_program() {
        let err = ToolError::Spawn {
            program: "ruff".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("ruff"));
    }
}
