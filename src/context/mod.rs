//! Per-invocation run context.
//!
//! Every step launched in one invocation shares the same experiment
//! grouping and a scoped temporary working area. The tracking
//! identifiers are attached to each child process's environment; the
//! orchestrator's own environment is never mutated. The temporary area
//! is removed when the context drops, on failure paths as well as the
//! normal one.

use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

/// Environment variable naming the tracking project.
pub const TRACKING_PROJECT_VAR: &str = "WANDB_PROJECT";
/// Environment variable naming the run group within the project.
pub const TRACKING_RUN_GROUP_VAR: &str = "WANDB_RUN_GROUP";

/// State shared by every step of one invocation.
///
/// Written once at open time and read-only afterwards.
#[derive(Debug)]
pub struct RunContext {
    project: String,
    experiment_group: String,
    temp_dir: TempDir,
}

impl RunContext {
    /// Opens a new run context with a fresh scratch directory.
    pub fn open(
        project: impl Into<String>,
        experiment_group: impl Into<String>,
    ) -> std::io::Result<Self> {
        let context = Self {
            project: project.into(),
            experiment_group: experiment_group.into(),
            temp_dir: TempDir::new()?,
        };
        debug!(
            project = %context.project,
            group = %context.experiment_group,
            scratch = %context.temp_dir.path().display(),
            "opened run context"
        );
        Ok(context)
    }

    /// Tracking project identifier.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Run group shared by every step of this invocation.
    pub fn experiment_group(&self) -> &str {
        &self.experiment_group
    }

    /// Scratch directory for intermediate files; removed when the context
    /// drops.
    pub fn scratch_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Tracking environment attached to every step's child process.
    pub fn env(&self) -> Vec<(&'static str, &str)> {
        vec![
            (TRACKING_PROJECT_VAR, self.project.as_str()),
            (TRACKING_RUN_GROUP_VAR, self.experiment_group.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_pairs() {
        let context = RunContext::open("nyc_airbnb", "development").unwrap();
        assert_eq!(
            context.env(),
            vec![
                ("WANDB_PROJECT", "nyc_airbnb"),
                ("WANDB_RUN_GROUP", "development"),
            ]
        );
    }

    #[test]
    fn test_scratch_dir_exists_while_open() {
        let context = RunContext::open("proj", "group").unwrap();
        assert!(context.scratch_dir().is_dir());
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let path = {
            let context = RunContext::open("proj", "group").unwrap();
            std::fs::write(context.scratch_dir().join("rf_config.json"), "{}").unwrap();
            context.scratch_dir().to_path_buf()
        };
        assert!(!path.exists());
    }
}
