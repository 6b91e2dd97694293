//! CLI command definitions for pipeforge.
//!
//! `run` drives one pipeline invocation end to end; `steps` lists the
//! registered steps and their parameter contracts.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::config::ConfigTree;
use crate::context::RunContext;
use crate::pipeline::{MlflowLauncher, Orchestrator};
use crate::registry::{StepLocation, StepRegistry};

/// Default configuration document, resolved against the launch directory.
const DEFAULT_CONFIG: &str = "config.yaml";

/// ML pipeline orchestrator for isolated, versioned pipeline components.
#[derive(Parser)]
#[command(name = "pipeforge")]
#[command(about = "Run multi-step ML pipelines built from isolated components")]
#[command(version)]
#[command(
    long_about = "pipeforge runs a training pipeline as a sequence of isolated MLproject components,\nwiring artifact names and versions between them.\n\nExample usage:\n  pipeforge run --config config.yaml --steps download,basic_cleaning"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run the active pipeline steps in order.
    Run(RunArgs),

    /// List the registered steps, their components and parameters.
    Steps,
}

/// Arguments for `pipeforge run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Pipeline configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG, env = "PIPEFORGE_CONFIG")]
    pub config: PathBuf,

    /// Override the configured step selection ("all" or a comma-separated
    /// list of step names).
    #[arg(short, long)]
    pub steps: Option<String>,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Executes the parsed CLI command.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run_pipeline(args).await,
        Commands::Steps => {
            list_steps();
            Ok(())
        }
    }
}

/// Runs one pipeline invocation.
async fn run_pipeline(args: RunArgs) -> anyhow::Result<()> {
    let config = ConfigTree::load(&args.config)?;
    let registry = StepRegistry::builtin();
    let project_root = std::env::current_dir()?;

    let context = RunContext::open(
        config.str("main.project_name")?,
        config.str("main.experiment_name")?,
    )?;

    let orchestrator = Orchestrator::new(&config, &registry, MlflowLauncher, project_root);
    match args.steps.as_deref() {
        Some(steps) => orchestrator.run_selection(&context, steps).await?,
        None => orchestrator.run(&context).await?,
    }

    info!(project = %context.project(), group = %context.experiment_group(), "pipeline finished");
    Ok(())
}

/// Prints the step catalogue.
fn list_steps() {
    let registry = StepRegistry::builtin();
    for descriptor in registry.all() {
        let marker = if descriptor.explicit_only {
            " (explicit only)"
        } else {
            ""
        };
        println!("{}{marker}", descriptor.name);

        match descriptor.location {
            StepLocation::Component(dir) => println!("  component: {dir} (components repository)"),
            StepLocation::Local(dir) => println!("  component: {dir}"),
        }
        if !descriptor.depends_on.is_empty() {
            println!("  after: {}", descriptor.depends_on.join(", "));
        }
        println!("  parameters: {}", descriptor.parameters.join(", "));
    }
}
