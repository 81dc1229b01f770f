//! CLI module for fs-inventory
//!
//! Argument parsing for the dynamic inventory script interface: `--list`,
//! `--host` and `--graph`, plus the site and map options.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde_yaml::Value;
use std::path::PathBuf;

use fs_inventory::config::InventoryConfig;
use fs_inventory::GenerateOptions;

/// fs-inventory - Dynamic inventory from host definition files
#[derive(Parser, Debug, Clone)]
#[command(name = "fs-inventory")]
#[command(version)]
#[command(about = "Dynamic inventory built from grouped host definition files", long_about = None)]
pub struct Cli {
    /// Print the whole inventory (default)
    #[arg(long, conflicts_with_all = ["host", "graph"])]
    pub list: bool,

    /// Print the variables of a single host or alias
    #[arg(long, value_name = "NAME", conflicts_with = "graph")]
    pub host: Option<String>,

    /// Print the group tree
    #[arg(long)]
    pub graph: bool,

    /// Inventory source file; its directory is the site directory
    #[arg(short = 'c', long, env = "FS_INVENTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Site directory holding the definitions directory
    #[arg(short = 's', long = "site-directory")]
    pub site_directory: Option<PathBuf>,

    /// The site's base domain
    #[arg(short = 'd', long = "environment-domain")]
    pub environment_domain: Option<String>,

    /// Path to a YAML file with the OS class map under 'data'
    #[arg(long = "os-class-map", value_name = "PATH")]
    pub os_class_map: Option<PathBuf>,

    /// Path to a YAML file with the sub-group map under 'data'
    #[arg(long = "sub-group-map", value_name = "PATH")]
    pub sub_group_map: Option<PathBuf>,

    /// Only include hosts with this fully qualified name (repeatable)
    #[arg(short = 'l', long = "limit", value_name = "FQDN", action = ArgAction::Append)]
    pub limit: Vec<String>,

    /// Skip the site and produce a single mock host
    #[arg(long = "mock-host", value_name = "NAME")]
    pub mock_host: Option<String>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub output: OutputFormat,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for inventory data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON, as expected from dynamic inventory scripts
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// What to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Whole inventory
    List,
    /// One host's variables
    Host(String),
    /// Group tree
    Graph,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(2).min(3)
        } else {
            self.verbose.min(3)
        }
    }

    /// Requested output mode
    pub fn mode(&self) -> Mode {
        if self.list {
            return Mode::List;
        }
        match (&self.host, self.graph) {
            (Some(host), _) => Mode::Host(host.clone()),
            (None, true) => Mode::Graph,
            (None, false) => Mode::List,
        }
    }

    /// Build the configuration from the config file, environment and flags
    pub fn resolve_config(&self) -> Result<InventoryConfig> {
        let mut config = match (&self.config, &self.site_directory) {
            (Some(path), _) => InventoryConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            (None, Some(site)) => {
                let mut config = InventoryConfig::for_site(site);
                config.apply_env_overrides();
                config
            }
            (None, None) => bail!("either --config or --site-directory is required"),
        };

        if let (Some(_), Some(site)) = (&self.config, &self.site_directory) {
            config.site_directory = site.clone();
        }
        if let Some(domain) = &self.environment_domain {
            config.environment_domain = Some(domain.clone());
        }
        if let Some(path) = &self.os_class_map {
            config.os_class_map = Value::String(path.display().to_string());
        }
        if let Some(path) = &self.sub_group_map {
            config.sub_group_map = Value::String(path.display().to_string());
        }

        Ok(config)
    }

    /// Per-run generation options
    pub fn generate_options(&self) -> GenerateOptions {
        let mut options = GenerateOptions::new();
        if !self.limit.is_empty() {
            options = options.with_filter(self.limit.iter().cloned());
        }
        if let Some(mock) = &self.mock_host {
            options = options.with_host_mock(mock.clone());
        }
        options
    }
}
