//! Vetter CLI - mode-driven quality tool orchestration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use vetter_core::{EngineConfig, ToolCategory, ToolOutcome};
use vetter_engine::{validate, ApplicabilityRule, QualityEngine};
use vetter_tools::CommandTool;

#[derive(Parser)]
#[command(name = "vetter")]
#[command(about = "Mode-driven quality tool orchestrator", long_about = None)]
struct Cli {
    /// Engine config file
    #[arg(long, default_value = "vetter.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run quality tools over a set of files
    Run {
        /// Mode to resolve (defaults to the config's default mode)
        #[arg(long)]
        mode: Option<String>,
        /// Files to analyze
        files: Vec<PathBuf>,
    },
    /// Check the config's mode/tool references
    Validate,
    /// List configured tools and modes
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Run { mode, files } => {
            let mode = mode.unwrap_or_else(|| config.default_mode.clone());
            let engine = build_engine(config)?;

            let output = engine.execute(&mode, &files).await?;
            info!("invocation {} finished", output.invocation_id);

            let mut names: Vec<&String> = output.summary.keys().collect();
            names.sort_unstable();

            println!("Mode: {}", output.mode);
            for name in names {
                match &output.summary[name] {
                    ToolOutcome::Completed(result) => {
                        println!("  {} | {} | {} issue(s)", name, result.category, result.count());
                    }
                    ToolOutcome::Failed(record) => {
                        println!("  {} | {} | {}", name, record.error_kind, record.message);
                    }
                }
            }
            println!("Issues: {}", output.aggregated_issue_count);
            println!("Success: {}", output.success);

            if !output.success {
                std::process::exit(1);
            }
        }
        Commands::Validate => {
            validate(&config)?;
            println!("{} is valid", cli.config.display());
        }
        Commands::Tools => {
            println!("Tools ({})", config.tools.len());
            for (name, tool) in &config.tools {
                println!(
                    "  {} | {} | timeout {}s",
                    name,
                    if tool.enabled { "enabled" } else { "disabled" },
                    tool.timeout_seconds,
                );
            }
            println!("Modes ({})", config.modes.len());
            for (name, tools) in &config.modes {
                println!("  {} -> {}", name, tools.join(", "));
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Build an engine whose adapters come from each tool's `settings`.
///
/// Recognized settings keys: `command` (program, defaults to the tool
/// name), `args`, `fix_args`, `issue_pattern`, `category`, and
/// `extensions` (the tool's smart-mode applicability rule).
fn build_engine(config: EngineConfig) -> Result<QualityEngine> {
    let mut builder = QualityEngine::builder(config.clone());

    for (name, tool_config) in &config.tools {
        let settings = &tool_config.settings;

        let program = settings
            .get("command")
            .and_then(|v| v.as_str())
            .unwrap_or(name);

        let mut tool = CommandTool::new(name, program).with_category(parse_category(
            settings.get("category").and_then(|v| v.as_str()),
        ));

        if let Some(args) = string_array(settings.get("args")) {
            tool = tool.with_args(args);
        }
        if let Some(fix_args) = string_array(settings.get("fix_args")) {
            tool = tool.with_fix_args(fix_args);
        }
        if let Some(pattern) = settings.get("issue_pattern").and_then(|v| v.as_str()) {
            tool = tool
                .with_issue_pattern(pattern)
                .map_err(|e| anyhow::anyhow!("bad issue_pattern for '{}': {}", name, e))?;
        }

        builder = builder.register_tool(Arc::new(tool));

        if let Some(extensions) = string_array(settings.get("extensions")) {
            builder = builder.with_rule(ApplicabilityRule::new(name, extensions));
        }
    }

    Ok(builder.build()?)
}

fn string_array(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    value.and_then(|v| v.as_array()).map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()
    })
}

fn parse_category(s: Option<&str>) -> ToolCategory {
    match s.map(str::to_lowercase).as_deref() {
        Some("linting") => ToolCategory::Linting,
        Some("formatting") => ToolCategory::Formatting,
        Some("types") => ToolCategory::Types,
        Some("security") => ToolCategory::Security,
        Some("documentation") => ToolCategory::Documentation,
        Some("testing") => ToolCategory::Testing,
        Some("ai") => ToolCategory::Ai,
        _ => ToolCategory::General,
    }
}
