//! Inventory generation from a tree of host definition files.
//!
//! This module provides:
//! - Classification maps turning host-name codes into groups
//! - Traversal of the definitions tree with synthetic range expansion
//! - Per-host record building with variable merging and address derivation
//! - Assembly into dynamic inventory output and registration with a model
//!
//! The stages form a pull pipeline: the walker yields identities lazily, each
//! identity is turned into a record as it is pulled, and the assembler drains
//! the records.

pub mod adapter;
pub mod assembler;
pub mod classification;
pub mod definition;
pub mod group;
pub mod record;
pub mod synthetic;
pub mod walker;

pub use adapter::{register_inventory, InventorySink, DEFAULT_ROOT_GROUP};
pub use assembler::{AllGroup, InventoryMeta, InventoryOutput};
pub use classification::{Classification, ClassificationMap, ClassificationSource};
pub use definition::DefinitionPayload;
pub use group::{Group, GroupTree};
pub use record::{HostRecord, RecordBuilder, SystemType};
pub use walker::{HostIdentity, SiteWalk, SiteWalker};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::InventoryConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::InventoryResult;

/// Per-run options
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Only process hosts whose fully qualified name is listed
    pub filter: Option<HashSet<String>>,
    /// Skip traversal and produce this single host
    pub host_mock: Option<String>,
}

impl GenerateOptions {
    /// Options that process every host
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the run to the given fully qualified names
    pub fn with_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Produce a single mock host instead of walking the site
    pub fn with_host_mock(mut self, name: impl Into<String>) -> Self {
        self.host_mock = Some(name.into());
        self
    }
}

/// Generates inventories for one site
pub struct InventoryGenerator {
    site_directory: PathBuf,
    definitions_dir: PathBuf,
    environment_domain: String,
    os_class_map: ClassificationMap,
    sub_group_map: ClassificationMap,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for InventoryGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryGenerator")
            .field("site_directory", &self.site_directory)
            .field("definitions_dir", &self.definitions_dir)
            .field("environment_domain", &self.environment_domain)
            .field("os_class_map", &self.os_class_map)
            .field("sub_group_map", &self.sub_group_map)
            .finish_non_exhaustive()
    }
}

impl InventoryGenerator {
    /// Create a generator for a site with empty classification maps.
    ///
    /// Definitions are read from `{site_directory}/definitions`.
    pub fn new(site_directory: impl Into<PathBuf>, environment_domain: impl Into<String>) -> Self {
        let site_directory = site_directory.into();
        Self {
            definitions_dir: site_directory.join(crate::config::DEFAULT_DEFINITIONS_DIR),
            site_directory,
            environment_domain: environment_domain.into(),
            os_class_map: ClassificationMap::new(),
            sub_group_map: ClassificationMap::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Create a generator from configuration, loading both classification maps
    pub fn from_config(config: &InventoryConfig, sink: Arc<dyn DiagnosticSink>) -> InventoryResult<Self> {
        let os_class_map = ClassificationMap::load(&config.os_class_source()?, sink.as_ref())?;
        let sub_group_map = ClassificationMap::load(&config.sub_group_source()?, sink.as_ref())?;

        Ok(Self {
            site_directory: config.site_directory().to_path_buf(),
            definitions_dir: config.definitions_root(),
            environment_domain: config.environment_domain()?.to_string(),
            os_class_map,
            sub_group_map,
            sink,
        })
    }

    /// Read definitions from a different directory
    pub fn with_definitions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.definitions_dir = dir.into();
        self
    }

    /// Use an OS class map
    pub fn with_os_class_map(mut self, map: ClassificationMap) -> Self {
        self.os_class_map = map;
        self
    }

    /// Use a sub-group map
    pub fn with_sub_group_map(mut self, map: ClassificationMap) -> Self {
        self.sub_group_map = map;
        self
    }

    /// Report diagnostics to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Site directory
    pub fn site_directory(&self) -> &Path {
        &self.site_directory
    }

    /// Definitions root
    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    /// Environment domain
    pub fn environment_domain(&self) -> &str {
        &self.environment_domain
    }

    /// Walker over this site's definitions
    pub fn walker(&self) -> SiteWalker {
        SiteWalker::new(
            &self.definitions_dir,
            &self.environment_domain,
            Arc::clone(&self.sink),
        )
    }

    /// Record builder bound to this generator's maps
    pub fn record_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(
            &self.os_class_map,
            &self.sub_group_map,
            &self.environment_domain,
            &self.site_directory,
            self.sink.as_ref(),
        )
    }

    /// Run the full pipeline
    pub fn generate(&self, options: &GenerateOptions) -> InventoryResult<InventoryOutput> {
        let builder = self.record_builder();

        if let Some(mock) = &options.host_mock {
            tracing::debug!("Using mock host {}, skipping site traversal", mock);
            let identity = HostIdentity {
                definition_file: PathBuf::from(mock),
                fqdn: mock.clone(),
                short_name: mock.clone(),
            };
            let records = builder.build(&identity);
            return Ok(InventoryOutput::assemble(records, self.sink.as_ref()));
        }

        let walker = self.walker();
        let identities = walker.walk()?.filter(|identity| {
            options
                .filter
                .as_ref()
                .map_or(true, |names| names.contains(&identity.fqdn))
        });
        let records = identities.filter_map(|identity| builder.build(&identity));
        let output = InventoryOutput::assemble(records, self.sink.as_ref());

        tracing::debug!(
            "Generated inventory for {} with {} host entries",
            self.definitions_dir.display(),
            output.len()
        );
        Ok(output)
    }
}
