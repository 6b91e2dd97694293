//! Artifact naming rules.
//!
//! Steps hand artifacts to each other through the tracking store by name
//! and version, never through the orchestrator. The naming convention
//! differs by direction: a step that produces an artifact is given the
//! bare name (the store assigns a version at write time), while a step
//! that consumes one must name a version explicitly, defaulting to the
//! most recent.

use crate::error::ArtifactError;

/// Version qualifier used when a read reference does not name one.
pub const LATEST: &str = "latest";

/// A named, optionally versioned artifact handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    name: String,
    version: Option<String>,
}

impl ArtifactRef {
    /// Parses a configured artifact string of the form `name[:version]`.
    pub fn parse(configured: &str) -> Self {
        match configured.split_once(':') {
            Some((name, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Self {
                name: configured.to_string(),
                version: None,
            },
        }
    }

    /// Bare artifact name without any qualifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version qualifier, if the configured string carried one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Returns the bare name used when a step is declared to produce this
/// artifact, stripping any configured `:<version>` qualifier.
pub fn write_target(configured: &str) -> Result<String, ArtifactError> {
    let reference = ArtifactRef::parse(configured);
    if reference.name.is_empty() {
        return Err(ArtifactError::EmptyName(configured.to_string()));
    }
    Ok(reference.name)
}

/// Returns the qualified reference used when a step consumes this
/// artifact. A configured qualifier wins; otherwise the reference points
/// at the most recent version.
pub fn read_reference(configured: &str) -> String {
    read_reference_with(configured, LATEST)
}

/// Like [`read_reference`] but with an explicit default version.
pub fn read_reference_with(configured: &str, default_version: &str) -> String {
    if configured.contains(':') {
        configured.to_string()
    } else {
        format!("{configured}:{default_version}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_version() {
        let reference = ArtifactRef::parse("clean_data.csv:latest");
        assert_eq!(reference.name(), "clean_data.csv");
        assert_eq!(reference.version(), Some("latest"));
    }

    #[test]
    fn test_parse_without_version() {
        let reference = ArtifactRef::parse("clean_data.csv");
        assert_eq!(reference.name(), "clean_data.csv");
        assert_eq!(reference.version(), None);
    }

    #[test]
    fn test_write_target_strips_qualifier() {
        assert_eq!(
            write_target("clean_data.csv:latest").unwrap(),
            "clean_data.csv"
        );
        assert_eq!(write_target("model_export:prod").unwrap(), "model_export");
    }

    #[test]
    fn test_write_target_identity_without_qualifier() {
        assert_eq!(write_target("clean_data.csv").unwrap(), "clean_data.csv");
    }

    #[test]
    fn test_write_target_is_idempotent() {
        let once = write_target("clean_data.csv:latest").unwrap();
        let twice = write_target(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_write_target_rejects_empty_name() {
        assert!(matches!(
            write_target(":latest"),
            Err(ArtifactError::EmptyName(_))
        ));
        assert!(matches!(write_target(""), Err(ArtifactError::EmptyName(_))));
    }

    #[test]
    fn test_read_reference_appends_latest() {
        assert_eq!(read_reference("clean_data.csv"), "clean_data.csv:latest");
    }

    #[test]
    fn test_read_reference_identity_when_qualified() {
        assert_eq!(
            read_reference("clean_data.csv:reference"),
            "clean_data.csv:reference"
        );
        assert_eq!(read_reference("clean_data.csv:latest"), "clean_data.csv:latest");
    }

    #[test]
    fn test_read_reference_with_custom_default() {
        assert_eq!(
            read_reference_with("model_export", "prod"),
            "model_export:prod"
        );
        assert_eq!(
            read_reference_with("model_export:v3", "prod"),
            "model_export:v3"
        );
    }
}
