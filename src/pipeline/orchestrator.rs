//! The pipeline driver.
//!
//! Resolves the active step set, validates the whole set against the
//! registry before anything runs, derives each step's parameters from
//! configuration and the artifact naming rules, and launches the steps
//! in order. Execution is strictly sequential and fail-fast: the first
//! failing step halts the invocation and every later step is skipped.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::artifact;
use crate::config::{ConfigTree, Scalar};
use crate::context::RunContext;
use crate::error::PipelineError;
use crate::registry::{step_names, StepDescriptor, StepLocation, StepRegistry};

use super::launcher::{StepInvocation, StepLauncher};
use super::selector;

/// Name of the serialized hyperparameter document.
const RF_CONFIG_FILENAME: &str = "rf_config.json";

/// Drives one pipeline invocation.
pub struct Orchestrator<'a, L> {
    config: &'a ConfigTree,
    registry: &'a StepRegistry,
    launcher: L,
    /// Directory the orchestrator was launched from; local components and
    /// the components repository resolve against it.
    project_root: PathBuf,
}

impl<'a, L: StepLauncher> Orchestrator<'a, L> {
    /// Creates an orchestrator over the given configuration and registry.
    pub fn new(
        config: &'a ConfigTree,
        registry: &'a StepRegistry,
        launcher: L,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            registry,
            launcher,
            project_root: project_root.into(),
        }
    }

    /// Runs the steps selected by the configured `main.steps` value.
    pub async fn run(&self, context: &RunContext) -> Result<(), PipelineError> {
        let steps_value = self.config.str("main.steps")?.to_string();
        self.run_selection(context, &steps_value).await
    }

    /// Runs the steps selected by an explicit selection value, which takes
    /// the same form as `main.steps` (`"all"` or a comma-separated list).
    pub async fn run_selection(
        &self,
        context: &RunContext,
        steps_value: &str,
    ) -> Result<(), PipelineError> {
        let default_order = self.registry.default_order();
        let active = selector::select(steps_value, &default_order);

        self.validate(&active)?;
        info!(steps = ?active, group = %context.experiment_group(), "resolved active step set");

        for name in &active {
            let invocation = self.resolve(name, context)?;
            self.launcher.launch(&invocation, context).await?;
        }

        Ok(())
    }

    /// Validates the whole active set before any step runs.
    ///
    /// Every name must exist in the catalogue, and whenever a step and one
    /// of its dependencies are both selected, the dependency must come
    /// first. A selected step whose dependency is absent from the set is
    /// legal: that is how an operator resumes from a step whose inputs
    /// were produced by a previous invocation.
    fn validate(&self, active: &[String]) -> Result<(), PipelineError> {
        for name in active {
            self.registry.get(name)?;
        }

        for (position, name) in active.iter().enumerate() {
            let descriptor = self.registry.get(name)?;
            for dependency in descriptor.depends_on {
                let runs_earlier = active[..position].iter().any(|step| step == dependency);
                if runs_earlier {
                    continue;
                }
                if active[position..].iter().any(|step| step == dependency) {
                    return Err(PipelineError::DependencyOrder {
                        step: name.clone(),
                        dependency: (*dependency).to_string(),
                    });
                }
                debug!(
                    step = %name,
                    dependency,
                    "dependency not selected; expecting its artifact from a previous run"
                );
            }
        }

        Ok(())
    }

    /// Resolves one step name into a launchable invocation.
    fn resolve(&self, name: &str, context: &RunContext) -> Result<StepInvocation, PipelineError> {
        let descriptor = self.registry.get(name)?;
        Ok(StepInvocation {
            step: name.to_string(),
            project_dir: self.project_dir(descriptor)?,
            parameters: self.parameters(descriptor, context)?,
        })
    }

    /// Resolves a descriptor's location against the launch directory.
    fn project_dir(&self, descriptor: &StepDescriptor) -> Result<PathBuf, PipelineError> {
        match descriptor.location {
            StepLocation::Component(dir) => {
                let repo = self.config.str("main.components_repository")?;
                Ok(self.project_root.join(repo).join(dir))
            }
            StepLocation::Local(dir) => Ok(self.project_root.join(dir)),
        }
    }

    /// Builds the parameter mapping for one step.
    fn parameters(
        &self,
        descriptor: &StepDescriptor,
        context: &RunContext,
    ) -> Result<Vec<(String, Scalar)>, PipelineError> {
        let parameters = match descriptor.name {
            step_names::DOWNLOAD => vec![
                ("sample", self.config.scalar("etl.sample")?),
                ("artifact_name", Scalar::from("sample.csv")),
                ("artifact_type", Scalar::from("raw_data")),
                ("artifact_description", Scalar::from("Raw file as downloaded")),
            ],
            step_names::BASIC_CLEANING => {
                // The produced name must be bare: the tracking store
                // assigns the version at write time.
                let output = artifact::write_target(self.config.str("etl.cleaned")?)?;
                vec![
                    (
                        "input_artifact",
                        Scalar::from(artifact::read_reference(self.config.str("etl.input")?)),
                    ),
                    ("output_artifact", Scalar::from(output)),
                    ("output_type", Scalar::from("clean_data")),
                    (
                        "output_description",
                        Scalar::from("Data with basic cleaning applied"),
                    ),
                    ("min_price", self.config.scalar("etl.min_price")?),
                    ("max_price", self.config.scalar("etl.max_price")?),
                ]
            }
            step_names::DATA_CHECK => vec![
                (
                    "csv",
                    Scalar::from(artifact::read_reference(self.config.str("etl.cleaned")?)),
                ),
                (
                    "ref",
                    Scalar::from(artifact::read_reference(self.config.str("data_check.ref")?)),
                ),
                ("kl_threshold", self.config.scalar("data_check.kl_threshold")?),
                ("min_price", self.config.scalar("etl.min_price")?),
                ("max_price", self.config.scalar("etl.max_price")?),
            ],
            step_names::DATA_SPLIT => vec![
                (
                    "input",
                    Scalar::from(artifact::read_reference(self.config.str("etl.cleaned")?)),
                ),
                ("test_size", self.config.scalar("modeling.test_size")?),
                ("random_seed", self.config.scalar("modeling.random_seed")?),
                ("stratify_by", self.config.scalar("modeling.stratify_by")?),
            ],
            step_names::TRAIN_RANDOM_FOREST => {
                let rf_config = self.serialize_rf_config(context)?;
                vec![
                    (
                        "trainval_artifact",
                        Scalar::from(artifact::read_reference("trainval_data.csv")),
                    ),
                    ("val_size", self.config.scalar("modeling.val_size")?),
                    ("random_seed", self.config.scalar("modeling.random_seed")?),
                    ("stratify_by", self.config.scalar("modeling.stratify_by")?),
                    ("rf_config", Scalar::from(rf_config.display().to_string())),
                    (
                        "max_tfidf_features",
                        self.config.scalar("modeling.max_tfidf_features")?,
                    ),
                    (
                        "output_artifact",
                        Scalar::from(artifact::write_target("random_forest_export")?),
                    ),
                ]
            }
            step_names::TEST_REGRESSION_MODEL => vec![
                (
                    "mlflow_model",
                    Scalar::from(artifact::read_reference_with("model_export", "prod")),
                ),
                (
                    "test_dataset",
                    Scalar::from(artifact::read_reference("test_data.csv")),
                ),
            ],
            other => return Err(PipelineError::UnknownStep(other.to_string())),
        };

        Ok(parameters
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect())
    }

    /// Writes the hyperparameter subtree as a standalone JSON document in
    /// the run context's scratch area.
    ///
    /// Serialized fresh on every run, so the training step always sees
    /// the configuration the operator invoked with.
    fn serialize_rf_config(&self, context: &RunContext) -> Result<PathBuf, PipelineError> {
        let subtree = self.config.subtree("modeling.random_forest")?;
        let path = context.scratch_dir().join(RF_CONFIG_FILENAME);
        fs::write(&path, serde_json::to_string_pretty(subtree)?)?;
        debug!(path = %path.display(), "serialized hyperparameter config");
        Ok(path)
    }
}
