//! Configuration for the file-system inventory.
//!
//! Settings come from, in increasing priority:
//! - Default values
//! - The inventory source file (YAML, `plugin: file_system`)
//! - Environment variables
//! - Command-line arguments (applied by the binary)
//!
//! ```yaml
//! plugin: file_system
//! environment_domain: example.org
//! os_class_map: /srv/site/os_class_map.yaml
//! sub_group_map:
//!   dck:
//!     - dck: Docker Microservices Host
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, InventoryResult};
use crate::inventory::adapter::DEFAULT_ROOT_GROUP;
use crate::inventory::classification::ClassificationSource;

/// Plugin name accepted in the `plugin` key
pub const PLUGIN_NAME: &str = "file_system";

/// Directory under the site holding group directories
pub const DEFAULT_DEFINITIONS_DIR: &str = "definitions";

/// Environment variable overriding `environment_domain`
pub const ENV_ENVIRONMENT_DOMAIN: &str = "FS_INVENTORY_ENVIRONMENT_DOMAIN";

/// Environment variable overriding `os_class_map` with a file path
pub const ENV_OS_CLASS_MAP: &str = "FS_INVENTORY_OS_CLASS_MAP";

/// Environment variable overriding `sub_group_map` with a file path
pub const ENV_SUB_GROUP_MAP: &str = "FS_INVENTORY_SUB_GROUP_MAP";

/// Inventory source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Plugin name; must be `file_system` when present
    pub plugin: Option<String>,

    /// The site's base domain
    pub environment_domain: Option<String>,

    /// OS class map: inline mapping or path to a file with a `data` key
    pub os_class_map: Value,

    /// Sub-group map: inline mapping or path to a file with a `data` key
    pub sub_group_map: Value,

    /// Definitions root, relative to the site directory unless absolute
    pub definitions_dir: PathBuf,

    /// Group every derived group is linked under
    pub root_group: String,

    /// Directory the configuration was loaded from
    #[serde(skip)]
    pub site_directory: PathBuf,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            plugin: None,
            environment_domain: None,
            os_class_map: Value::Null,
            sub_group_map: Value::Null,
            definitions_dir: PathBuf::from(DEFAULT_DEFINITIONS_DIR),
            root_group: DEFAULT_ROOT_GROUP.to_string(),
            site_directory: PathBuf::from("."),
        }
    }
}

impl InventoryConfig {
    /// Configuration for a site directory with default settings
    pub fn for_site(site_directory: impl Into<PathBuf>) -> Self {
        Self {
            site_directory: site_directory.into(),
            ..Self::default()
        }
    }

    /// Load an inventory source file.
    ///
    /// The site directory is the directory containing the file. Environment
    /// overrides are applied after the file is read.
    pub fn load(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        config.site_directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        config.apply_env_overrides();

        tracing::debug!("Loaded inventory configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text and check the plugin name
    pub fn from_yaml(content: &str) -> InventoryResult<Self> {
        let document: Value = serde_yaml::from_str(content)?;
        let config: Self = if document.is_null() {
            Self::default()
        } else {
            serde_yaml::from_value(document)?
        };
        config.check_plugin()?;
        Ok(config)
    }

    fn check_plugin(&self) -> InventoryResult<()> {
        match self.plugin.as_deref() {
            None => Ok(()),
            Some(name) if name == PLUGIN_NAME || name.ends_with(&format!(".{PLUGIN_NAME}")) => {
                Ok(())
            }
            Some(other) => Err(InventoryError::invalid_config(
                "plugin",
                format!("expected '{PLUGIN_NAME}', found '{other}'"),
            )),
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        // FS_INVENTORY_ENVIRONMENT_DOMAIN
        if let Ok(domain) = std::env::var(ENV_ENVIRONMENT_DOMAIN) {
            if !domain.is_empty() {
                self.environment_domain = Some(domain);
            }
        }

        // FS_INVENTORY_OS_CLASS_MAP
        if let Ok(path) = std::env::var(ENV_OS_CLASS_MAP) {
            self.os_class_map = Value::String(path);
        }

        // FS_INVENTORY_SUB_GROUP_MAP
        if let Ok(path) = std::env::var(ENV_SUB_GROUP_MAP) {
            self.sub_group_map = Value::String(path);
        }
    }

    /// The configured environment domain
    pub fn environment_domain(&self) -> InventoryResult<&str> {
        self.environment_domain
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| InventoryError::MissingOption("environment_domain".to_string()))
    }

    /// Where the OS class map comes from
    pub fn os_class_source(&self) -> InventoryResult<ClassificationSource> {
        ClassificationSource::from_value(&self.os_class_map)
    }

    /// Where the sub-group map comes from
    pub fn sub_group_source(&self) -> InventoryResult<ClassificationSource> {
        ClassificationSource::from_value(&self.sub_group_map)
    }

    /// Site directory
    pub fn site_directory(&self) -> &Path {
        &self.site_directory
    }

    /// Definitions root
    pub fn definitions_root(&self) -> PathBuf {
        if self.definitions_dir.is_absolute() {
            self.definitions_dir.clone()
        } else {
            self.site_directory.join(&self.definitions_dir)
        }
    }
}
