//! Classification maps.
//!
//! A classification map turns the code embedded in a host name into one or
//! more `(code, label)` pairs:
//!
//! ```yaml
//! dck:
//!   - app: Application Server
//!   - dck: Docker Microservices Host
//! lxr3:
//!   - lxr3: Linux Raspberry PI Model 3
//! ```
//!
//! Maps are supplied inline, as a path to a YAML file holding the map under
//! its `data` key, or not at all.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{InventoryError, InventoryResult};
use crate::vars::scalar_to_string;

/// One `(code, label)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Group code, used as a group name
    pub code: String,
    /// Human readable label
    pub label: String,
}

impl Classification {
    /// Create a new pair
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Where a classification map comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationSource {
    /// No map configured
    Empty,
    /// Map given directly in configuration
    Inline(Mapping),
    /// YAML file with the map under its `data` key
    File(PathBuf),
}

impl ClassificationSource {
    /// Interpret a configuration value.
    ///
    /// Mappings are inline maps, non-empty strings are file paths, and null
    /// or an empty string means no map.
    pub fn from_value(value: &Value) -> InventoryResult<Self> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::String(s) if s.trim().is_empty() => Ok(Self::Empty),
            Value::String(s) => Ok(Self::File(PathBuf::from(s))),
            Value::Mapping(m) if m.is_empty() => Ok(Self::Empty),
            Value::Mapping(m) => Ok(Self::Inline(m.clone())),
            other => Err(InventoryError::InvalidClassificationMap(format!(
                "expected a mapping or a file path, found {}",
                value_kind(other)
            ))),
        }
    }
}

/// Lookup table from a host-name code to its classifications
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationMap {
    entries: IndexMap<String, Vec<Classification>>,
}

impl ClassificationMap {
    /// Create an empty map; every lookup resolves to nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a map from its configured source
    pub fn load(source: &ClassificationSource, sink: &dyn DiagnosticSink) -> InventoryResult<Self> {
        match source {
            ClassificationSource::Empty => Ok(Self::new()),
            ClassificationSource::Inline(mapping) => Self::from_mapping(mapping, sink),
            ClassificationSource::File(path) => Self::from_file(path, sink),
        }
    }

    /// Load a map from the `data` key of a YAML file.
    ///
    /// A missing or malformed file is an error. A file without a `data` key
    /// yields an empty map.
    pub fn from_file(path: &Path, sink: &dyn DiagnosticSink) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InventoryError::classification_load(path, e.to_string()))?;
        let document: Value = serde_yaml::from_str(&content)
            .map_err(|e| InventoryError::classification_load(path, e.to_string()))?;

        match document {
            Value::Null => Ok(Self::new()),
            Value::Mapping(ref top) => match top.get("data") {
                None | Some(Value::Null) => Ok(Self::new()),
                Some(Value::Mapping(data)) => Self::from_mapping(data, sink),
                Some(other) => Err(InventoryError::classification_load(
                    path,
                    format!("'data' must be a mapping, found {}", value_kind(other)),
                )),
            },
            ref other => Err(InventoryError::classification_load(
                path,
                format!("expected a mapping document, found {}", value_kind(other)),
            )),
        }
    }

    /// Build a map from an inline mapping
    pub fn from_mapping(mapping: &Mapping, sink: &dyn DiagnosticSink) -> InventoryResult<Self> {
        let mut entries = IndexMap::with_capacity(mapping.len());

        for (key, value) in mapping {
            let code = scalar_to_string(key).ok_or_else(|| {
                InventoryError::InvalidClassificationMap(format!(
                    "codes must be scalars, found {}",
                    value_kind(key)
                ))
            })?;

            let pairs = match value {
                Value::Sequence(items) => items
                    .iter()
                    .filter_map(|item| match first_pair(item) {
                        Ok(pair) => Some(pair),
                        Err(message) => {
                            sink.report(Diagnostic::ClassificationEntryIgnored {
                                code: code.clone(),
                                message,
                            });
                            None
                        }
                    })
                    .collect(),
                Value::Null => Vec::new(),
                other => {
                    sink.report(Diagnostic::ClassificationEntryIgnored {
                        code: code.clone(),
                        message: format!("expected a list, found {}", value_kind(other)),
                    });
                    Vec::new()
                }
            };

            entries.insert(code, pairs);
        }

        Ok(Self { entries })
    }

    /// Classifications for a code; unknown codes resolve to an empty slice
    pub fn lookup(&self, code: &str) -> &[Classification] {
        self.entries.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Split the classifications for a code into parallel code and label lists
    pub fn resolve(&self, code: &str) -> (Vec<String>, Vec<String>) {
        self.lookup(code)
            .iter()
            .map(|c| (c.code.clone(), c.label.clone()))
            .unzip()
    }

    /// Number of configured codes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no codes are configured
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured codes in declaration order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn first_pair(item: &Value) -> Result<Classification, String> {
    let mapping = item
        .as_mapping()
        .ok_or_else(|| format!("expected a 'code: label' mapping, found {}", value_kind(item)))?;
    let (code, label) = mapping
        .iter()
        .next()
        .ok_or_else(|| "empty mapping".to_string())?;

    match (scalar_to_string(code), scalar_to_string(label)) {
        (Some(code), Some(label)) => Ok(Classification { code, label }),
        _ => Err("code and label must be scalars".to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SUB_GROUPS: &str = r#"
dck:
  - app: Application Server
  - dck: Docker Microservices Host
vcs:
  - vcs: Version/Source Control Server
"#;

    fn inline(yaml: &str) -> ClassificationMap {
        let mapping: Mapping = serde_yaml::from_str(yaml).unwrap();
        ClassificationMap::from_mapping(&mapping, &MemorySink::new()).unwrap()
    }

    #[test]
    fn test_code_with_multiple_labels() {
        let map = inline(SUB_GROUPS);
        let (codes, labels) = map.resolve("dck");
        assert_eq!(codes, vec!["app", "dck"]);
        assert_eq!(
            labels,
            vec!["Application Server", "Docker Microservices Host"]
        );
    }

    #[test]
    fn test_unknown_code_is_empty() {
        let map = inline(SUB_GROUPS);
        assert!(map.lookup("fso").is_empty());
        let (codes, labels) = map.resolve("fso");
        assert!(codes.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_source_from_value() {
        assert_eq!(
            ClassificationSource::from_value(&Value::Null).unwrap(),
            ClassificationSource::Empty
        );
        assert_eq!(
            ClassificationSource::from_value(&Value::from("")).unwrap(),
            ClassificationSource::Empty
        );
        assert_eq!(
            ClassificationSource::from_value(&Value::from("/srv/map.yaml")).unwrap(),
            ClassificationSource::File(PathBuf::from("/srv/map.yaml"))
        );
        assert!(ClassificationSource::from_value(&Value::from(3)).is_err());
    }

    #[test]
    fn test_load_from_file_data_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  lxr3:\n    - lxr3: Linux Raspberry PI Model 3").unwrap();

        let source = ClassificationSource::File(file.path().to_path_buf());
        let map = ClassificationMap::load(&source, &MemorySink::new()).unwrap();
        assert_eq!(
            map.lookup("lxr3"),
            &[Classification::new("lxr3", "Linux Raspberry PI Model 3")]
        );
    }

    #[test]
    fn test_file_without_data_key_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "lxr3:\n  - lxr3: Linux Raspberry PI Model 3").unwrap();

        let map = ClassificationMap::from_file(file.path(), &MemorySink::new()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let source = ClassificationSource::File(PathBuf::from("/nonexistent/os_class_map.yaml"));
        let err = ClassificationMap::load(&source, &MemorySink::new()).unwrap_err();
        assert!(matches!(err, InventoryError::ClassificationMapLoad { .. }));
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data: [unclosed").unwrap();

        let err = ClassificationMap::from_file(file.path(), &MemorySink::new()).unwrap_err();
        assert!(matches!(err, InventoryError::ClassificationMapLoad { .. }));
    }

    #[test]
    fn test_bad_items_are_reported_and_skipped() {
        let sink = MemorySink::new();
        let mapping: Mapping =
            serde_yaml::from_str("NOMATCH:\n  - ''\nlxol:\n  - lxol: Oracle Linux").unwrap();
        let map = ClassificationMap::from_mapping(&mapping, &sink).unwrap();

        assert!(map.lookup("NOMATCH").is_empty());
        assert_eq!(map.lookup("lxol").len(), 1);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_codes_keep_declaration_order() {
        let map = inline(SUB_GROUPS);
        assert_eq!(map.codes().collect::<Vec<_>>(), vec!["dck", "vcs"]);
        assert_eq!(map.len(), 2);
    }
}
