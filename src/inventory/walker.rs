//! Site traversal.
//!
//! The definitions root holds one directory per primary group, each with
//! `.yaml` definition files. Walking the root yields one [`HostIdentity`] per
//! concrete host, expanding synthetic names as it goes. A walk re-lists the
//! file system every time, so the same [`SiteWalker`] can be iterated again.

use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::synthetic::HostNames;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{InventoryError, InventoryResult};

/// Name that never gets the environment domain appended
pub const LOCALHOST: &str = "localhost";

/// Extension a definition file must carry
pub const DEFINITION_EXTENSION: &str = "yaml";

/// One concrete host found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Definition file the host came from
    pub definition_file: PathBuf,
    /// Fully qualified name
    pub fqdn: String,
    /// Short host name
    pub short_name: String,
}

impl HostIdentity {
    /// Build an identity, qualifying the short name with a domain
    pub fn new(
        definition_file: impl Into<PathBuf>,
        short_name: impl Into<String>,
        environment_domain: &str,
    ) -> Self {
        let short_name = short_name.into();
        Self {
            definition_file: definition_file.into(),
            fqdn: qualify(&short_name, environment_domain),
            short_name,
        }
    }
}

/// Fully qualified form of a short host name
pub fn qualify(short_name: &str, environment_domain: &str) -> String {
    if short_name == LOCALHOST {
        short_name.to_string()
    } else {
        format!("{short_name}.{environment_domain}")
    }
}

/// Walks a definitions root
pub struct SiteWalker {
    root: PathBuf,
    environment_domain: String,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for SiteWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteWalker")
            .field("root", &self.root)
            .field("environment_domain", &self.environment_domain)
            .finish_non_exhaustive()
    }
}

impl SiteWalker {
    /// Create a walker over `root`
    pub fn new(
        root: impl Into<PathBuf>,
        environment_domain: impl Into<String>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            root: root.into(),
            environment_domain: environment_domain.into(),
            sink,
        }
    }

    /// The definitions root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a fresh walk.
    ///
    /// Fails only if the root itself cannot be listed. Group directories that
    /// cannot be read are reported and skipped.
    pub fn walk(&self) -> InventoryResult<SiteWalk<'_>> {
        let groups = fs::read_dir(&self.root).map_err(|e| InventoryError::DefinitionsDirectory {
            path: self.root.clone(),
            message: e.to_string(),
        })?;

        Ok(SiteWalk {
            walker: self,
            groups,
            files: None,
            current: None,
        })
    }

    fn names_for(path: &Path) -> Option<HostNames> {
        if path.extension().and_then(|e| e.to_str()) != Some(DEFINITION_EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        Some(HostNames::new(stem))
    }
}

/// A single pass over the definitions root
pub struct SiteWalk<'a> {
    walker: &'a SiteWalker,
    groups: ReadDir,
    files: Option<ReadDir>,
    /// Definition file being expanded, one host per `next()`
    current: Option<(PathBuf, HostNames)>,
}

impl SiteWalk<'_> {
    fn ignore(&self, path: PathBuf) {
        self.walker.sink.report(Diagnostic::EntryIgnored { path });
    }

    fn next_group(&mut self) -> Option<ReadDir> {
        loop {
            let entry = match self.groups.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(
                        "Skipping unreadable entry in {}: {}",
                        self.walker.root.display(),
                        e
                    );
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_dir() {
                self.ignore(path);
                continue;
            }
            match fs::read_dir(&path) {
                Ok(files) => return Some(files),
                Err(e) => {
                    self.walker.sink.report(Diagnostic::DefinitionUnreadable {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

impl Iterator for SiteWalk<'_> {
    type Item = HostIdentity;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, names)) = &mut self.current {
                if let Some(short) = names.next() {
                    return Some(HostIdentity::new(
                        path.as_path(),
                        short,
                        &self.walker.environment_domain,
                    ));
                }
            }
            self.current = None;

            let Some(files) = self.files.as_mut() else {
                self.files = Some(self.next_group()?);
                continue;
            };
            let Some(entry) = files.next() else {
                self.files = None;
                continue;
            };
            let Ok(entry) = entry else {
                continue;
            };

            let path = entry.path();
            let names = if path.is_file() {
                SiteWalker::names_for(&path)
            } else {
                None
            };
            match names {
                Some(names) => self.current = Some((path, names)),
                None => self.ignore(path),
            }
        }
    }
}
