//! Launching step components.
//!
//! Each step is an MLproject directory executed through the `mlflow`
//! command-line interface with its `main` entry point under conda
//! isolation. The launcher is a trait seam so the orchestrator can be
//! exercised with a recording fake in tests.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::info;

use crate::config::Scalar;
use crate::context::RunContext;
use crate::error::PipelineError;

/// Entry point invoked in every component.
const ENTRY_POINT: &str = "main";
/// Environment isolation mode handed to the component runner.
const ENV_MANAGER: &str = "conda";

/// A step invocation resolved against configuration, ready to launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInvocation {
    /// Step name, for diagnostics and failure reporting.
    pub step: String,
    /// MLproject directory of the runnable component.
    pub project_dir: PathBuf,
    /// Resolved `-P` parameters in contract order.
    pub parameters: Vec<(String, Scalar)>,
}

/// Seam between the orchestrator and the external component runner.
#[async_trait]
pub trait StepLauncher {
    /// Runs one step to completion, blocking until it terminates.
    ///
    /// There is no timeout: a hung step hangs the pipeline.
    async fn launch(
        &self,
        invocation: &StepInvocation,
        context: &RunContext,
    ) -> Result<(), PipelineError>;
}

/// Launches steps through the `mlflow` command-line interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct MlflowLauncher;

impl MlflowLauncher {
    /// Builds the `mlflow run` argument list for one invocation.
    pub fn build_args(invocation: &StepInvocation) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            invocation.project_dir.display().to_string(),
            "-e".to_string(),
            ENTRY_POINT.to_string(),
            "--env-manager".to_string(),
            ENV_MANAGER.to_string(),
        ];
        for (key, value) in &invocation.parameters {
            args.push("-P".to_string());
            args.push(format!("{key}={value}"));
        }
        args
    }
}

#[async_trait]
impl StepLauncher for MlflowLauncher {
    async fn launch(
        &self,
        invocation: &StepInvocation,
        context: &RunContext,
    ) -> Result<(), PipelineError> {
        info!(
            step = %invocation.step,
            dir = %invocation.project_dir.display(),
            "launching step"
        );

        let mut command = Command::new("mlflow");
        command.args(Self::build_args(invocation));
        for (key, value) in context.env() {
            command.env(key, value);
        }

        // stdout/stderr stay inherited so the operator sees step output.
        let status = command
            .status()
            .await
            .map_err(|source| PipelineError::Spawn {
                step: invocation.step.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PipelineError::StepFailed {
                step: invocation.step.clone(),
                status,
            });
        }

        info!(step = %invocation.step, "step finished");
        Ok(())
    }
}
