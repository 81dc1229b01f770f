//! Diagnostics for inventory generation.
//!
//! Every pipeline stage receives a [`DiagnosticSink`] explicitly instead of
//! writing to a global logger. The default [`TracingSink`] forwards events to
//! `tracing`, so the verbosity chosen once at process start still applies.
//! [`MemorySink`] keeps events in memory for callers that want a report.

use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Fine-grained traversal detail
    Trace,
    /// Recoverable problems and per-host processing notes
    Debug,
    /// Configuration that was partially ignored
    Warn,
}

/// An event raised while generating an inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A definition file could not be read or parsed as YAML.
    DefinitionUnreadable {
        /// Definition file path
        path: PathBuf,
        /// Underlying error
        message: String,
    },
    /// A definition file parsed but its layout was not understood.
    DefinitionShape {
        /// Definition file path
        path: PathBuf,
        /// What was wrong
        message: String,
    },
    /// A host was dropped because its name cannot be classified.
    HostSkipped {
        /// Resolved host name
        name: String,
    },
    /// A host declares aliases.
    AliasesFound {
        /// Short host name
        host: String,
        /// Declared aliases
        aliases: Vec<String>,
    },
    /// A host record was produced.
    RecordBuilt {
        /// Resolved host name
        name: String,
    },
    /// A directory entry was not a group directory or definition file.
    EntryIgnored {
        /// Entry path
        path: PathBuf,
    },
    /// An item inside a classification map was not a `code: label` pair.
    ClassificationEntryIgnored {
        /// Code the item was listed under
        code: String,
        /// What was wrong
        message: String,
    },
}

impl Diagnostic {
    /// Severity of this event
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            Diagnostic::EntryIgnored { .. } => DiagnosticLevel::Trace,
            Diagnostic::ClassificationEntryIgnored { .. } => DiagnosticLevel::Warn,
            _ => DiagnosticLevel::Debug,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DefinitionUnreadable { path, message } => write!(
                f,
                "Encountered an error when reading {} - {}",
                path.display(),
                message
            ),
            Diagnostic::DefinitionShape { path, message } => write!(
                f,
                "Ignoring variables in {}: {}",
                path.display(),
                message
            ),
            Diagnostic::HostSkipped { name } => {
                write!(f, "Skipping {name}: no classification separator in name")
            }
            Diagnostic::AliasesFound { host, aliases } => {
                write!(f, "Found host aliases for {host}: {}", aliases.join(", "))
            }
            Diagnostic::RecordBuilt { name } => write!(f, "Processed record name is {name}"),
            Diagnostic::EntryIgnored { path } => write!(f, "Ignoring {}", path.display()),
            Diagnostic::ClassificationEntryIgnored { code, message } => {
                write!(f, "Ignoring classification entry under '{code}': {message}")
            }
        }
    }
}

/// Receiver of diagnostic events
pub trait DiagnosticSink: Send + Sync {
    /// Record one event
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that forwards every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.level() {
            DiagnosticLevel::Trace => tracing::trace!("{}", diagnostic),
            DiagnosticLevel::Debug => tracing::debug!("{}", diagnostic),
            DiagnosticLevel::Warn => tracing::warn!("{}", diagnostic),
        }
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events reported so far
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Events at or above a level
    pub fn at_least(&self, level: DiagnosticLevel) -> Vec<Diagnostic> {
        self.events
            .lock()
            .iter()
            .filter(|d| d.level() >= level)
            .cloned()
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        self.events.lock().push(diagnostic);
    }
}
