//! Quality engine - concurrent tool execution with failure isolation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use vetter_core::{
    EngineConfig, EngineError, EngineOutput, FailureKind, FailureRecord, InvocationId, Time,
    ToolConfig, ToolError, ToolOutcome, ToolResult,
};
use vetter_tools::{Tool, ToolRegistry};

use crate::resolver::{ApplicabilityRule, ModeResolver, ResolvedRun};
use crate::validate::validate;

/// The quality engine.
///
/// Holds a validated config, the registered tool implementations, and the
/// mode resolver. Read-only once built; safe to share across concurrent
/// invocations.
pub struct QualityEngine {
    config: Arc<EngineConfig>,
    registry: Arc<ToolRegistry>,
    resolver: ModeResolver,
}

/// Builder for [`QualityEngine`].
///
/// Lifecycle: register tools and rules, then `build()` validates the
/// config and yields a ready engine. Dropping the engine is shutdown.
pub struct QualityEngineBuilder {
    config: EngineConfig,
    registry: ToolRegistry,
    resolver: ModeResolver,
}

impl QualityEngineBuilder {
    /// Start a builder over a config.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: ToolRegistry::new(),
            resolver: ModeResolver::new(),
        }
    }

    /// Register a tool implementation under its own name.
    pub fn register_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.registry.register(tool);
        self
    }

    /// Register an applicability rule for the adaptive mode.
    pub fn with_rule(mut self, rule: ApplicabilityRule) -> Self {
        self.resolver = self.resolver.with_rule(rule);
        self
    }

    /// Rename the adaptive mode.
    pub fn with_smart_mode(mut self, name: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_smart_mode(name);
        self
    }

    /// Set the baseline mode the adaptive mode starts from.
    pub fn with_base_mode(mut self, name: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_base_mode(name);
        self
    }

    /// Validate the config and produce a ready engine.
    pub fn build(self) -> Result<QualityEngine, EngineError> {
        validate(&self.config)?;

        Ok(QualityEngine {
            config: Arc::new(self.config),
            registry: Arc::new(self.registry),
            resolver: self.resolver,
        })
    }
}

impl QualityEngine {
    /// Start a builder over a config.
    pub fn builder(config: EngineConfig) -> QualityEngineBuilder {
        QualityEngineBuilder::new(config)
    }

    /// The engine's config.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one invocation.
    ///
    /// Fails only for an unknown mode; per-tool failures surface inside
    /// the output's summary, never as errors.
    pub async fn execute(
        &self,
        mode: &str,
        files: &[PathBuf],
    ) -> Result<EngineOutput, EngineError> {
        self.execute_with_cancel(mode, files, CancellationToken::new())
            .await
    }

    /// Run one invocation under a caller-held cancellation token.
    ///
    /// On cancellation every unfinished tool is recorded as cancelled and
    /// a well-formed output is still produced.
    pub async fn execute_with_cancel(
        &self,
        mode: &str,
        files: &[PathBuf],
        cancel: CancellationToken,
    ) -> Result<EngineOutput, EngineError> {
        let invocation_id = InvocationId::new();
        let started_at = chrono::Utc::now();
        let start = std::time::Instant::now();
        tracing::debug!(%invocation_id, mode, files = files.len(), "invocation received");

        let run = self.resolver.resolve(&self.config, mode, files)?;
        tracing::debug!(%invocation_id, tools = ?run.tools, "mode resolved");

        let files: Arc<[PathBuf]> = files.into();
        let mut join_set = JoinSet::new();
        let mut task_names = HashMap::new();

        for name in run.tools.iter().cloned() {
            let tool = self.registry.get(&name);
            let tool_config = self.config.tool(&name).cloned().unwrap_or_default();
            let files = Arc::clone(&files);
            let cancel = cancel.child_token();

            let handle = join_set.spawn(run_tool(name.clone(), tool, tool_config, files, cancel));
            task_names.insert(handle.id(), name);
        }

        let mut summary: HashMap<String, ToolOutcome> = HashMap::with_capacity(run.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((name, outcome)) => {
                    summary.insert(name, outcome);
                }
                Err(e) => {
                    // A panicking tool task is attributed through the
                    // task-id map and isolated like any other failure.
                    if let Some(name) = task_names.get(&e.id()) {
                        tracing::warn!("tool task '{}' did not complete: {}", name, e);
                        summary.insert(
                            name.clone(),
                            ToolOutcome::Failed(FailureRecord::new(
                                name.clone(),
                                FailureKind::Error,
                                format!("tool task did not complete: {e}"),
                            )),
                        );
                    } else {
                        tracing::warn!("unattributed tool task failure: {}", e);
                    }
                }
            }
        }

        // Every resolved tool gets exactly one entry.
        for name in &run.tools {
            if !summary.contains_key(name) {
                summary.insert(
                    name.clone(),
                    ToolOutcome::Failed(FailureRecord::new(
                        name.clone(),
                        FailureKind::Cancelled,
                        "invocation aborted before the tool finished",
                    )),
                );
            }
        }

        let output = merge_outcomes(
            invocation_id,
            &run,
            summary,
            &self.config,
            started_at,
            start.elapsed(),
        );
        tracing::debug!(%invocation_id, success = output.success, "invocation complete");
        Ok(output)
    }
}

/// One tool's unit of concurrent execution.
async fn run_tool(
    name: String,
    tool: Option<Arc<dyn Tool>>,
    config: ToolConfig,
    files: Arc<[PathBuf]>,
    cancel: CancellationToken,
) -> (String, ToolOutcome) {
    let Some(tool) = tool else {
        return (
            name.clone(),
            ToolOutcome::Failed(FailureRecord::new(
                name,
                FailureKind::Error,
                "no implementation registered for this tool",
            )),
        );
    };

    let outcome = tokio::select! {
        _ = cancel.cancelled() => ToolOutcome::Failed(FailureRecord::new(
            &name,
            FailureKind::Cancelled,
            "invocation aborted before the tool finished",
        )),
        result = run_passes(tool.as_ref(), &files, &config) => match result {
            Ok(result) => ToolOutcome::Completed(result),
            Err(PassFailure::Timeout) => ToolOutcome::Failed(FailureRecord::new(
                &name,
                FailureKind::Timeout,
                format!("exceeded {}s deadline", config.timeout_seconds),
            )),
            Err(PassFailure::Tool(e)) => {
                tracing::warn!("tool '{}' failed: {}", name, e);
                ToolOutcome::Failed(FailureRecord::new(&name, FailureKind::Error, e.to_string()))
            }
        },
    };

    (name, outcome)
}

enum PassFailure {
    Timeout,
    Tool(ToolError),
}

/// Run the tool once, or twice under fix-then-rescan.
///
/// The rescan pass runs with auto-fix off so it only verifies, and its
/// result is the one reported. Each pass gets the full tool deadline.
async fn run_passes(
    tool: &dyn Tool,
    files: &[PathBuf],
    config: &ToolConfig,
) -> Result<ToolResult, PassFailure> {
    let result = run_once(tool, files, config).await?;

    if config.auto_fix && config.rescan_after_fix {
        let rescan = ToolConfig {
            auto_fix: false,
            ..config.clone()
        };
        return run_once(tool, files, &rescan).await;
    }

    Ok(result)
}

async fn run_once(
    tool: &dyn Tool,
    files: &[PathBuf],
    config: &ToolConfig,
) -> Result<ToolResult, PassFailure> {
    match tokio::time::timeout(config.timeout(), tool.run(files, config)).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(PassFailure::Tool(e)),
        Err(_) => Err(PassFailure::Timeout),
    }
}

/// Reduce collected outcomes into the terminal output.
///
/// Commutative over the summary - independent of completion order.
fn merge_outcomes(
    invocation_id: InvocationId,
    run: &ResolvedRun,
    summary: HashMap<String, ToolOutcome>,
    config: &EngineConfig,
    started_at: Time,
    duration: std::time::Duration,
) -> EngineOutput {
    let any_failure = summary.values().any(|o| o.is_failure());

    let ceiling_exceeded = summary.values().filter_map(|o| o.result()).any(|result| {
        config
            .tool(&result.tool_name)
            .and_then(|t| t.max_issues)
            .is_some_and(|max| result.count() > max)
    });

    let aggregated_issue_count = summary
        .values()
        .filter_map(|o| o.result())
        .map(|r| r.count())
        .sum();

    EngineOutput {
        invocation_id,
        mode: run.mode.clone(),
        success: !any_failure && !ceiling_exceeded,
        summary,
        aggregated_issue_count,
        started_at,
        duration,
    }
}
