//! # fs-inventory - Dynamic inventory from host definition files
//!
//! Builds an orchestration inventory from a directory tree of per-host YAML
//! definition files. Group membership, OS classification and connection
//! addresses are inferred from how the files are named and where they live;
//! nothing is persisted and no external service is consulted.
//!
//! ## Site layout
//!
//! ```text
//! site/
//! ├── inventory.yaml            plugin: file_system, environment_domain, maps
//! └── definitions/
//!     ├── controller/
//!     │   └── localhost.yaml
//!     ├── linux/                primary group "linux"
//!     │   ├── lxr3-fso-01.yaml
//!     │   └── lxr3-dck-[01-04].yaml   expands to four hosts
//!     └── vms/
//!         └── lxr3-vdi-01@lxhost-kvm-01.yaml
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! SiteWalker ──HostIdentity──▶ RecordBuilder ──HostRecord──▶ InventoryOutput
//!                                   ▲                              │
//!                        ClassificationMap x2                      ▼
//!                                                     register_inventory(sink)
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use fs_inventory::prelude::*;
//!
//! let config = InventoryConfig::load("site/inventory.yaml")?;
//! let generator = InventoryGenerator::from_config(&config, Arc::new(TracingSink))?;
//! let output = generator.generate(&GenerateOptions::new())?;
//! println!("{}", serde_json::to_string_pretty(&output)?);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod inventory;
pub mod vars;

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::config::InventoryConfig;
    pub use crate::diagnostics::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
    pub use crate::error::{InventoryError, InventoryResult};
    pub use crate::inventory::{
        register_inventory, ClassificationMap, GenerateOptions, GroupTree, HostIdentity,
        HostRecord, InventoryGenerator, InventoryOutput, InventorySink,
    };
    pub use crate::vars::{merge, Vars};
    pub use std::sync::Arc;
}

pub use error::{InventoryError, InventoryResult};
pub use inventory::{GenerateOptions, InventoryGenerator, InventoryOutput};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
