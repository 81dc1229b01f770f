//! Definition file contents.
//!
//! Two layouts are understood. A mapping exposing its variables under `vars`:
//!
//! ```yaml
//! vars:
//!   system_type: lxd
//!   lxd_host: lxhost-kvm-01
//! ```
//!
//! or a list of entries where every `set_fact` contributes variables:
//!
//! ```yaml
//! - set_fact:
//!     system_type: qemu
//! - set_fact:
//!     host_aliases: [nas]
//! ```

use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::error::{InventoryError, InventoryResult};
use crate::vars::{merge, Vars};

/// Declared variables of a definition file, by layout
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionPayload {
    /// Single `vars` mapping
    SingleVars(Mapping),
    /// `set_fact` contributions in file order
    FactList(Vec<Mapping>),
    /// Nothing declared
    Empty,
}

impl DefinitionPayload {
    /// Read and classify a definition file
    pub fn read(path: &Path) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: Value = serde_yaml::from_str(&content)?;
        Self::from_value(document).map_err(|message| InventoryError::DefinitionShape {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Classify a parsed document
    pub fn from_value(document: Value) -> Result<Self, String> {
        match document {
            Value::Null => Ok(Self::Empty),
            Value::Mapping(mut top) => match top.remove("vars") {
                None | Some(Value::Null) => Ok(Self::Empty),
                Some(Value::Mapping(vars)) => Ok(Self::SingleVars(vars)),
                Some(_) => Err("'vars' is not a mapping".to_string()),
            },
            Value::Sequence(entries) => Self::from_entries(entries),
            _ => Err("expected a mapping or a list of entries".to_string()),
        }
    }

    fn from_entries(entries: Vec<Value>) -> Result<Self, String> {
        let mut facts = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match entry.get("set_fact") {
                None | Some(Value::Null) => {}
                Some(Value::Mapping(fact)) if fact.is_empty() => {}
                Some(Value::Mapping(fact)) => facts.push(fact.clone()),
                Some(_) => return Err(format!("entry {index}: 'set_fact' is not a mapping")),
            }
        }

        if !facts.is_empty() {
            return Ok(Self::FactList(facts));
        }

        match entries.first().and_then(|first| first.get("vars")) {
            Some(Value::Mapping(vars)) => Ok(Self::SingleVars(vars.clone())),
            _ => Ok(Self::Empty),
        }
    }

    /// Reduce to one variable set.
    ///
    /// Facts are merged in file order; an earlier fact keeps its value when a
    /// later one sets the same key, and later facts only fill in gaps.
    pub fn into_vars(self) -> Vars {
        match self {
            Self::SingleVars(vars) => vars,
            Self::FactList(facts) => facts
                .iter()
                .fold(Vars::new(), |merged, fact| merge(&merged, fact)),
            Self::Empty => Vars::new(),
        }
    }
}
