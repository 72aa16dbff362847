//! Input sources and document loading
//!
//! An experiment document comes from a file or from standard input (`-`).
//! The text may be YAML or JSON and may hold several documents; a document
//! whose `kind` ends in `List` contributes each of its `items`.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::experiment::Experiment;
use crate::{Error, Result};

/// Marker selecting standard input.
pub const STDIN_MARKER: &str = "-";

/// Where experiment documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input
    Stdin,
    /// A file on disk
    Path(PathBuf),
}

impl From<&str> for Source {
    fn from(arg: &str) -> Self {
        if arg == STDIN_MARKER {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Source {
    /// Read the whole source as text. `stdin` is only consulted for
    /// [`Source::Stdin`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputUnavailable`] if the source cannot be read, is
    /// not UTF-8, or holds only whitespace.
    pub fn read(&self, stdin: &mut dyn Read) -> Result<String> {
        let text = match self {
            Self::Stdin => {
                let mut text = String::new();
                stdin
                    .read_to_string(&mut text)
                    .map_err(|e| Error::InputUnavailable(format!("{self}: {e}")))?;
                text
            }
            Self::Path(path) => fs::read_to_string(path)
                .map_err(|e| Error::InputUnavailable(format!("{self}: {e}")))?,
        };
        if text.trim().is_empty() {
            return Err(Error::InputUnavailable(format!("{self}: input is empty")));
        }
        debug!(source = %self, bytes = text.len(), "read experiment input");
        Ok(text)
    }
}

fn is_list(value: &Value) -> bool {
    value
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with("List"))
}

fn experiment_from(value: Value, document: usize) -> Result<Experiment> {
    serde_yaml::from_value(value)
        .map_err(|e| Error::Deserialization(format!("document {document}: {e}")))
}

/// Parse every experiment in `text`.
///
/// Empty documents are skipped.
///
/// # Errors
///
/// Returns [`Error::Deserialization`] naming the offending document if any
/// document is not valid YAML or does not fit the experiment schema.
pub fn load_experiments(text: &str) -> Result<Vec<Experiment>> {
    let mut experiments = Vec::new();
    for (document, de) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let value = Value::deserialize(de)
            .map_err(|e| Error::Deserialization(format!("document {document}: {e}")))?;
        if value.is_null() {
            warn!(document, "skipping empty document");
            continue;
        }
        if is_list(&value) {
            let items = match value.get("items") {
                Some(Value::Sequence(items)) => items.clone(),
                None | Some(Value::Null) => Vec::new(),
                Some(_) => {
                    return Err(Error::Deserialization(format!(
                        "document {document}: list items must be a sequence"
                    )))
                }
            };
            debug!(document, items = items.len(), "loading experiment list");
            for item in items {
                experiments.push(experiment_from(item, document)?);
            }
        } else {
            experiments.push(experiment_from(value, document)?);
        }
    }
    Ok(experiments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_arg() {
        assert_eq!(Source::from("-"), Source::Stdin);
        assert_eq!(Source::from("exp.yaml"), Source::Path(PathBuf::from("exp.yaml")));
    }

    #[test]
    fn test_read_stdin() {
        let mut stdin = "metadata: {name: exp}\n".as_bytes();
        let text = Source::Stdin.read(&mut stdin).expect("readable");
        assert!(text.contains("exp"));
    }

    #[test]
    fn test_read_blank_stdin() {
        let mut stdin = "  \n".as_bytes();
        assert!(matches!(
            Source::Stdin.read(&mut stdin),
            Err(Error::InputUnavailable(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let source = Source::from("/nonexistent/expctl/experiment.yaml");
        assert!(matches!(
            source.read(&mut std::io::empty()),
            Err(Error::InputUnavailable(_))
        ));
    }

    #[test]
    fn test_load_multi_document() {
        let experiments =
            load_experiments("metadata: {name: a}\n---\n---\nmetadata: {name: b}\n").expect("valid");
        let names: Vec<&str> = experiments.iter().map(Experiment::name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_load_list() {
        let experiments = load_experiments(
            "apiVersion: v1\nkind: List\nitems:\n- metadata: {name: a}\n- metadata: {name: b}\n",
        )
        .expect("valid");
        assert_eq!(experiments.len(), 2);
    }

    #[test]
    fn test_load_json() {
        let experiments =
            load_experiments(r#"{"metadata": {"name": "a", "namespace": "ns"}}"#).expect("valid");
        assert_eq!(experiments[0].namespace(), "ns");
    }

    #[test]
    fn test_load_bad_yaml() {
        for bad in ["abc 123 xyz", "abc:\nabc:1", "- 1\n- 2\n"] {
            assert!(
                matches!(load_experiments(bad), Err(Error::Deserialization(_))),
                "{bad:?} should not load"
            );
        }
    }
}
