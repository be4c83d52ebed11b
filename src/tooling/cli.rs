//! CLI Tooling
//!
//! Command-line interface for building, inspecting, and exporting
//! prompt-generated projects.

use crate::config::{ConfigLoader, WeaveConfig};
use crate::error::BuildError;
use crate::export::export_to_file;
use crate::generation::{ChatMessage, GenerationClient};
use crate::sandbox::local::LocalSandbox;
use crate::sandbox::boot_channel;
use crate::session::BuilderSession;
use crate::step::{BuildStep, StepStatus};
use crate::tree::collect_files;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Weave CLI - step-driven project builder
#[derive(Parser)]
#[command(name = "weave")]
#[command(about = "Turn prompts into runnable projects via step-driven file trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a project and reconcile it into a virtual file tree
    Build {
        /// Natural-language prompt describing the project
        #[arg(long)]
        prompt: String,

        /// Mount the tree into this directory as a local sandbox
        #[arg(long)]
        sandbox_dir: Option<PathBuf>,

        /// Run generated shell steps inside the sandbox after mounting
        #[arg(long, default_value = "false")]
        run_commands: bool,
    },
    /// Show the steps a prompt produces, without reconciling them
    Steps {
        #[arg(long)]
        prompt: String,
    },
    /// Generate, reconcile, and export the project as a zip archive
    Export {
        #[arg(long)]
        prompt: String,

        /// Archive output path
        #[arg(long, default_value = "project.zip")]
        output: PathBuf,
    },
}

/// Execution context for CLI commands.
pub struct CliContext {
    config: WeaveConfig,
}

impl CliContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, BuildError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WeaveConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, BuildError> {
        match command {
            Commands::Build {
                prompt,
                sandbox_dir,
                run_commands,
            } => {
                let mut session = BuilderSession::new();

                if let Some(dir) = sandbox_dir {
                    let (ready, signal) = boot_channel();
                    ready.ready(Arc::new(LocalSandbox::new(dir.clone())));
                    let timeout = Duration::from_millis(self.config.sandbox.boot_timeout_ms);
                    session.bridge().await_boot(signal, timeout).await?;
                }

                self.generate(prompt, &mut session).await?;
                let summary = session.reconcile().await;
                info!(
                    completed = summary.completed,
                    failed = summary.failed,
                    mounted = summary.mounted_now,
                    "Build reconciled"
                );

                let mut output = format_steps(session.steps());
                if *run_commands && session.bridge().is_available() {
                    for command in &summary.commands {
                        let result = session
                            .bridge()
                            .run_command("sh", &["-c".to_string(), command.clone()])
                            .await?;
                        let _ = write!(
                            output,
                            "\n$ {command} (exit {})\n{}",
                            result.exit_code, result.output
                        );
                    }
                }
                if let Some(err) = &summary.mount_error {
                    let _ = write!(output, "\n{} {err}", "mount failed:".red());
                }
                Ok(output)
            }
            Commands::Steps { prompt } => {
                let mut session = BuilderSession::new();
                self.generate(prompt, &mut session).await?;
                Ok(format_steps(session.steps()))
            }
            Commands::Export { prompt, output } => {
                let mut session = BuilderSession::new();
                self.generate(prompt, &mut session).await?;
                let summary = session.reconcile().await;
                export_to_file(session.tree(), output)?;
                Ok(format!(
                    "Exported {} files to {} ({} steps, {} failed)",
                    collect_files(session.tree()).len(),
                    output.display(),
                    summary.completed,
                    summary.failed,
                ))
            }
        }
    }

    /// Run one generation round: template fetch, then a chat turn, both
    /// parsed into the session's step queue.
    async fn generate(
        &self,
        prompt: &str,
        session: &mut BuilderSession,
    ) -> Result<(), BuildError> {
        let client = GenerationClient::new(&self.config.backend.api_url);

        let template = client.fetch_template(prompt).await?;
        session.ingest_artifact(template.primary_artifact()?);

        let mut messages: Vec<ChatMessage> = template
            .prompts
            .iter()
            .map(|content| ChatMessage::user(content.clone()))
            .collect();
        messages.push(ChatMessage::user(prompt));

        let response = client.chat(&messages).await?;
        session.ingest_artifact(&response);
        Ok(())
    }
}

/// Render the step list with colored statuses.
pub fn format_steps(steps: &[BuildStep]) -> String {
    let mut out = String::new();
    for step in steps {
        let status = match step.status {
            StepStatus::Pending => "pending".yellow().to_string(),
            StepStatus::InProgress => "in-progress".blue().to_string(),
            StepStatus::Completed => "completed".green().to_string(),
            StepStatus::Failed => "failed".red().to_string(),
        };
        let _ = writeln!(out, "{:>4}  {:<12} {}", step.id, status, step.title);
        if let Some(reason) = &step.failure {
            let _ = writeln!(out, "      {}", reason.red());
        }
    }
    out
}
