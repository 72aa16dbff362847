//! Experiment - root entity of the resource schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_util::null_as_default;
use super::spec::ExperimentSpec;
use super::status::ExperimentStatus;
use crate::{Error, Result};

/// Identifying metadata of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    name: String,
    namespace: String,
    creation_timestamp: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    /// Get the resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the resource namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the creation timestamp, if recorded.
    #[must_use]
    pub const fn creation_timestamp(&self) -> Option<DateTime<Utc>> {
        self.creation_timestamp
    }
}

/// Experiment resource: metadata, declared spec, and observed status.
///
/// Deserialization is permissive: unknown fields are ignored and missing or
/// `null` sections default to empty. An Experiment is immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experiment {
    api_version: Option<String>,
    kind: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    metadata: ObjectMeta,
    #[serde(deserialize_with = "null_as_default")]
    spec: ExperimentSpec,
    #[serde(deserialize_with = "null_as_default")]
    status: ExperimentStatus,
}

impl Experiment {
    /// Parse one experiment from a YAML (or JSON) document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deserialization`] if the text is not structured data
    /// or does not fit the experiment schema.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Get the API version, if set.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Get the resource kind, if set.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Get the resource metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    /// Get the experiment namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.metadata.namespace()
    }

    /// Get the declared spec.
    #[must_use]
    pub const fn spec(&self) -> &ExperimentSpec {
        &self.spec
    }

    /// Get the observed status.
    #[must_use]
    pub const fn status(&self) -> &ExperimentStatus {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sections_default() {
        let experiment =
            Experiment::from_yaml("metadata:\n  name: exp\nspec: null\nstatus: null\n")
                .expect("valid experiment");
        assert_eq!(experiment.name(), "exp");
        assert_eq!(experiment.namespace(), "");
        assert!(experiment.spec().version_info().is_none());
        assert!(experiment.status().completed_iterations().is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let experiment = Experiment::from_yaml(
            "apiVersion: iter8.tools/v2alpha2\nkind: Experiment\nextra: 1\nmetadata:\n  name: exp\n  uid: abc\n",
        )
        .expect("valid experiment");
        assert_eq!(experiment.kind(), Some("Experiment"));
        assert_eq!(experiment.api_version(), Some("iter8.tools/v2alpha2"));
    }

    #[test]
    fn test_scalar_document_rejected() {
        assert!(matches!(
            Experiment::from_yaml("abc 123 xyz"),
            Err(Error::Deserialization(_))
        ));
    }
}
