//! Inventory output.
//!
//! Host records are collected into the layout dynamic inventory consumers
//! expect:
//!
//! ```json
//! { "all": { "hosts": ["lxr3-fso-01"], "vars": {} },
//!   "_meta": { "hostvars": { "lxr3-fso-01": { "primary_group": "linux" } } } }
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use super::record::HostRecord;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::vars::Vars;

/// The `all` group
#[derive(Debug, Clone, Default, Serialize)]
pub struct AllGroup {
    /// Host names and aliases in discovery order
    pub hosts: Vec<String>,
    /// Group variables; always empty
    pub vars: Vars,
}

/// The `_meta` section
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryMeta {
    /// Variables by host name or alias
    pub hostvars: IndexMap<String, Arc<HostRecord>>,
}

/// A generated inventory
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryOutput {
    /// The `all` group
    pub all: AllGroup,
    /// Per-host variables
    #[serde(rename = "_meta")]
    pub meta: InventoryMeta,
}

impl InventoryOutput {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect a stream of records
    pub fn assemble<I>(records: I, sink: &dyn DiagnosticSink) -> Self
    where
        I: IntoIterator<Item = HostRecord>,
    {
        let mut output = Self::new();
        for record in records {
            output.push(record, sink);
        }
        output
    }

    /// Add one record under its short name and under each of its aliases.
    ///
    /// A name seen before is listed again and its variables are replaced.
    pub fn push(&mut self, record: HostRecord, sink: &dyn DiagnosticSink) {
        let aliases = record.host_aliases();
        let record = Arc::new(record);

        self.add(record.hostname.clone(), Arc::clone(&record));

        if !aliases.is_empty() {
            sink.report(Diagnostic::AliasesFound {
                host: record.hostname.clone(),
                aliases: aliases.clone(),
            });
        }
        for alias in aliases {
            self.add(alias, Arc::clone(&record));
        }
    }

    fn add(&mut self, name: String, record: Arc<HostRecord>) {
        self.all.hosts.push(name.clone());
        self.meta.hostvars.insert(name, record);
    }

    /// Host names and aliases in discovery order
    pub fn hosts(&self) -> &[String] {
        &self.all.hosts
    }

    /// Record registered under a name or alias
    pub fn host_vars(&self, name: &str) -> Option<&HostRecord> {
        self.meta.hostvars.get(name).map(Arc::as_ref)
    }

    /// Number of listed names, aliases included
    pub fn len(&self) -> usize {
        self.all.hosts.len()
    }

    /// Whether no hosts were found
    pub fn is_empty(&self) -> bool {
        self.all.hosts.is_empty()
    }
}
