//! Step registry: the fixed catalogue of pipeline steps.
//!
//! Descriptors are defined at process start and never derived from
//! configuration. Each descriptor records where the step's runnable
//! component lives, the parameters its entry point requires, and which
//! other steps produce the artifacts it consumes.

use crate::error::PipelineError;

/// Canonical step names used in selection lists and parameter resolution.
pub mod step_names {
    /// Fetch the raw input sample.
    pub const DOWNLOAD: &str = "download";
    /// Drop out-of-range rows and obvious junk from the raw sample.
    pub const BASIC_CLEANING: &str = "basic_cleaning";
    /// Statistical checks of the cleaned data against a reference set.
    pub const DATA_CHECK: &str = "data_check";
    /// Split the cleaned data into train/validation and test sets.
    pub const DATA_SPLIT: &str = "data_split";
    /// Train the random forest model on the train/validation split.
    pub const TRAIN_RANDOM_FOREST: &str = "train_random_forest";
    /// Score a promoted model against the held-out test set.
    pub const TEST_REGRESSION_MODEL: &str = "test_regression_model";
}

/// Where a step's runnable project directory is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepLocation {
    /// An entry in the shared components repository
    /// (`main.components_repository` in the configuration).
    Component(&'static str),
    /// A directory in the orchestrator's own repository.
    Local(&'static str),
}

/// Descriptor of a single pipeline step.
#[derive(Debug, Clone)]
pub struct StepDescriptor {
    /// Unique step name, as written in a selection list.
    pub name: &'static str,
    /// Location of the runnable component.
    pub location: StepLocation,
    /// Parameter names the step's entry point requires, in contract order.
    pub parameters: &'static [&'static str],
    /// Steps that must have produced their artifacts before this one runs.
    pub depends_on: &'static [&'static str],
    /// Excluded from the `"all"` selection; must be requested by name.
    pub explicit_only: bool,
}

/// The fixed, ordered catalogue of known steps.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDescriptor>,
}

impl StepRegistry {
    /// Builds the built-in step catalogue.
    pub fn builtin() -> Self {
        use step_names::*;

        Self {
            steps: vec![
                StepDescriptor {
                    name: DOWNLOAD,
                    location: StepLocation::Component("get_data"),
                    parameters: &[
                        "sample",
                        "artifact_name",
                        "artifact_type",
                        "artifact_description",
                    ],
                    depends_on: &[],
                    explicit_only: false,
                },
                StepDescriptor {
                    name: BASIC_CLEANING,
                    location: StepLocation::Local("src/basic_cleaning"),
                    parameters: &[
                        "input_artifact",
                        "output_artifact",
                        "output_type",
                        "output_description",
                        "min_price",
                        "max_price",
                    ],
                    depends_on: &[DOWNLOAD],
                    explicit_only: false,
                },
                StepDescriptor {
                    name: DATA_CHECK,
                    location: StepLocation::Local("src/data_check"),
                    parameters: &["csv", "ref", "kl_threshold", "min_price", "max_price"],
                    depends_on: &[BASIC_CLEANING],
                    explicit_only: false,
                },
                StepDescriptor {
                    name: DATA_SPLIT,
                    location: StepLocation::Component("train_val_test_split"),
                    parameters: &["input", "test_size", "random_seed", "stratify_by"],
                    depends_on: &[BASIC_CLEANING],
                    explicit_only: false,
                },
                StepDescriptor {
                    name: TRAIN_RANDOM_FOREST,
                    location: StepLocation::Local("src/train_random_forest"),
                    parameters: &[
                        "trainval_artifact",
                        "val_size",
                        "random_seed",
                        "stratify_by",
                        "rf_config",
                        "max_tfidf_features",
                        "output_artifact",
                    ],
                    depends_on: &[DATA_SPLIT],
                    explicit_only: false,
                },
                // Runs against a model export promoted to "prod", so it is
                // never part of the default selection.
                StepDescriptor {
                    name: TEST_REGRESSION_MODEL,
                    location: StepLocation::Component("test_regression_model"),
                    parameters: &["mlflow_model", "test_dataset"],
                    depends_on: &[TRAIN_RANDOM_FOREST],
                    explicit_only: true,
                },
            ],
        }
    }

    /// Looks up a descriptor by name.
    pub fn get(&self, name: &str) -> Result<&StepDescriptor, PipelineError> {
        self.steps
            .iter()
            .find(|step| step.name == name)
            .ok_or_else(|| PipelineError::UnknownStep(name.to_string()))
    }

    /// Step names covered by the `"all"` selection, in catalogue order.
    pub fn default_order(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .filter(|step| !step.explicit_only)
            .map(|step| step.name)
            .collect()
    }

    /// Every descriptor in catalogue order.
    pub fn all(&self) -> &[StepDescriptor] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_step() {
        let registry = StepRegistry::builtin();
        let descriptor = registry.get(step_names::DATA_CHECK).unwrap();
        assert_eq!(descriptor.name, "data_check");
        assert_eq!(descriptor.location, StepLocation::Local("src/data_check"));
    }

    #[test]
    fn test_get_unknown_step() {
        let registry = StepRegistry::builtin();
        let result = registry.get("feature_engineering");
        assert!(matches!(result, Err(PipelineError::UnknownStep(_))));
    }

    #[test]
    fn test_default_order_excludes_explicit_only() {
        let registry = StepRegistry::builtin();
        assert_eq!(
            registry.default_order(),
            vec![
                "download",
                "basic_cleaning",
                "data_check",
                "data_split",
                "train_random_forest",
            ]
        );
    }

    #[test]
    fn test_explicit_only_step_is_still_registered() {
        let registry = StepRegistry::builtin();
        let descriptor = registry.get(step_names::TEST_REGRESSION_MODEL).unwrap();
        assert!(descriptor.explicit_only);
    }

    #[test]
    fn test_dependencies_reference_known_steps() {
        let registry = StepRegistry::builtin();
        for descriptor in registry.all() {
            for dependency in descriptor.depends_on {
                assert!(registry.get(dependency).is_ok(), "unknown dependency {dependency}");
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        let registry = StepRegistry::builtin();
        let mut names: Vec<_> = registry.all().iter().map(|step| step.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), registry.all().len());
    }
}
