//! Shared test utilities for the fs-inventory test suite.
//!
//! This module provides a builder for on-disk site trees and the sample
//! classification maps used across tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// OS class map in the layout of an inline plugin option
pub const OS_CLASS_MAP: &str = r#"
wl10:
  - wl10: Windows 10 Laptop
uxmb:
  - uxmb: OSX Macbook
lxol:
  - lxol: Linux (Oracle Enterprise Linux/OEL)
lxr3:
  - lxr3: Linux Raspberry PI Model 3
"#;

/// Sub-group map in the layout of an inline plugin option
pub const SUB_GROUP_MAP: &str = r#"
dck:
  - app: Application Server
  - dck: Docker Microservices Host
vcs:
  - vcs: Version/Source Control Server
ofc:
  - ofc: Office Computer
"#;

/// A temporary site directory
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    /// Create an empty site with a definitions directory
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("definitions")).unwrap();
        Self { dir }
    }

    /// Site directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a definition file below `definitions/`
    pub fn definition(&self, relative: &str, content: &str) -> PathBuf {
        self.file(&format!("definitions/{relative}"), content)
    }

    /// Write any file below the site directory
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write an inventory source file with inline maps
    pub fn inline_config(&self, domain: &str) -> PathBuf {
        let indent = |map: &str| {
            map.trim()
                .lines()
                .map(|l| format!("  {l}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.file(
            "inventory.yaml",
            &format!(
                "plugin: file_system\nenvironment_domain: {domain}\nos_class_map:\n{}\nsub_group_map:\n{}\n",
                indent(OS_CLASS_MAP),
                indent(SUB_GROUP_MAP)
            ),
        )
    }

    /// Write both maps as external files and an inventory source pointing at them
    pub fn external_config(&self, domain: &str) -> PathBuf {
        let os = self.file("maps/os_class_map.yaml", &data_file(OS_CLASS_MAP));
        let sub = self.file("maps/sub_group_map.yaml", &data_file(SUB_GROUP_MAP));
        self.file(
            "inventory.yaml",
            &format!(
                "plugin: file_system\nenvironment_domain: {domain}\nos_class_map: {}\nsub_group_map: {}\n",
                os.display(),
                sub.display()
            ),
        )
    }
}

fn data_file(map: &str) -> String {
    let body: String = map
        .trim()
        .lines()
        .map(|l| format!("  {l}\n"))
        .collect();
    format!("data:\n{body}")
}

/// Sort a list of names for order-independent comparison
pub fn sorted(names: &[String]) -> Vec<String> {
    let mut names = names.to_vec();
    names.sort();
    names
}
