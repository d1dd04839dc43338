//! Cadre CLI
//!
//! Runs the reference workflow from the command line.

use std::path::PathBuf;

use cadre_core::{run_workflow, AgentKind, AgentRegistry, CadreConfig, WorkflowRequest};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cadre")]
#[command(about = "Cadre - in-process multi-agent task runner")]
#[command(version)]
struct Cli {
    /// Config file (TOML or JSON); defaults to ~/.cadre/config.toml if present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one task per enabled agent
    Run {
        /// Task description handed to every agent
        #[arg(short, long)]
        task: String,

        /// Comma-separated agent kinds (researcher,analyzer,planner,executor)
        #[arg(short, long, value_delimiter = ',')]
        agents: Option<Vec<AgentKind>>,

        /// Model identifier
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature (0.0 - 1.0)
        #[arg(long)]
        temperature: Option<f64>,

        /// Maximum response tokens (100 - 4096)
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List agent kinds and the actions they understand
    Kinds,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Kinds => {
            for kind in AgentKind::all() {
                println!("{:<10} {}", kind.as_str(), kind.description());
                println!("{:<10} actions: {}", "", kind.actions().join(", "));
            }
            Ok(())
        }
        Command::Run {
            task,
            agents,
            model,
            temperature,
            max_tokens,
            json,
        } => {
            let config = match cli.config {
                Some(path) => CadreConfig::load(path)?,
                None => CadreConfig::load_standard()?,
            };

            let mut request = WorkflowRequest::from_defaults(task, &config.workflow);
            if let Some(kinds) = agents {
                request = request.with_agents(kinds);
            }
            if let Some(model) = model {
                request.model.model = model;
            }
            if let Some(temperature) = temperature {
                request.model.temperature = temperature;
            }
            if let Some(max_tokens) = max_tokens {
                request.model.max_tokens = max_tokens;
            }

            let registry = AgentRegistry::with_config(&config);
            let report = run_workflow(&registry, &request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Task: {}", report.description);
                println!("Model: {}", report.model.model);
                for step in &report.steps {
                    println!();
                    println!("== {} ({}) ==", step.kind.name(), step.agent_id);
                    match step.outcome.result() {
                        Some(result) => println!("{}", serde_json::to_string_pretty(result)?),
                        None => println!("failed: {}", step.outcome.error().unwrap_or("unknown")),
                    }
                }
                println!();
                println!(
                    "{} completed, {} failed",
                    report.completed(),
                    report.failed()
                );
            }

            registry.shutdown_all().await;
            if !report.all_succeeded() {
                tracing::warn!("Workflow finished with failures");
            }
            Ok(())
        }
    }
}
