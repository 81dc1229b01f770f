//! Host records.
//!
//! [`RecordBuilder`] turns one [`HostIdentity`] into a fully resolved
//! [`HostRecord`]: it classifies the host by name, lays down the derived base
//! variables, merges in what the definition file declares and finally works
//! out the connection addresses.

use serde::{Serialize, Serializer};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

use super::classification::ClassificationMap;
use super::definition::DefinitionPayload;
use super::walker::{HostIdentity, LOCALHOST};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::InventoryError;
use crate::vars::{is_truthy, merge, scalar_to_string, string_keyed, string_list, Vars};

/// Primary group assigned to the controller itself
pub const CONTROLLER_GROUP: &str = "ansible_controller";

/// Classification given to `localhost`
pub const LOCAL_CLASS: &str = "local";

/// Sub-group code used when a name has no second segment
pub const FALLBACK_SUB_GROUP: &str = "misc";

/// How a host is reached, read from its `system_type` variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    /// LXD container, reached through its `lxd_host`
    Lxd,
    /// Local QEMU guest, reached by short name
    Qemu,
    /// Anything else
    Other,
}

impl SystemType {
    fn of(vars: &Vars) -> Self {
        match vars.get("system_type").and_then(Value::as_str) {
            Some("lxd") => SystemType::Lxd,
            Some("qemu") => SystemType::Qemu,
            _ => SystemType::Other,
        }
    }
}

/// Fully resolved state of one host
#[derive(Debug, Clone, PartialEq)]
pub struct HostRecord {
    /// Short host name
    pub hostname: String,
    /// Resolved name, prefixed with the parent for nested hosts
    pub fqdn: String,
    /// Name of the directory holding the definition file
    pub primary_group: String,
    /// OS class codes
    pub os_classes: Vec<String>,
    /// Labels matching `os_classes` position for position
    pub os_class_names: Vec<String>,
    /// Sub-group codes
    pub sub_groups: Vec<String>,
    /// Labels matching `sub_groups` position for position
    pub sub_group_names: Vec<String>,
    /// Definition file the host came from
    pub definition_file: PathBuf,
    vars: Vars,
}

impl HostRecord {
    /// Every variable of the host, derived and declared
    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Look up one variable
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Additional names the host is registered under
    pub fn host_aliases(&self) -> Vec<String> {
        string_list(self.vars.get("host_aliases"))
    }

    /// Ad-hoc groups declared by the definition file
    pub fn extra_host_groups(&self) -> Vec<String> {
        string_list(self.vars.get("extra_host_groups"))
    }

    /// Address used by the orchestration host
    pub fn ansible_host(&self) -> Option<String> {
        self.vars.get("ansible_host").and_then(scalar_to_string)
    }

    /// Address used for SSH
    pub fn ansible_ssh_host(&self) -> Option<String> {
        self.vars.get("ansible_ssh_host").and_then(scalar_to_string)
    }

    /// Address used for Windows remote management, if any
    pub fn ansible_winrm_host(&self) -> Option<String> {
        self.vars.get("ansible_winrm_host").and_then(scalar_to_string)
    }
}

impl Serialize for HostRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.vars.serialize(serializer)
    }
}

/// Classification results for one host name
#[derive(Debug, Clone, PartialEq, Eq)]
struct Classes {
    primary_group: String,
    os_classes: Vec<String>,
    os_class_names: Vec<String>,
    sub_groups: Vec<String>,
    sub_group_names: Vec<String>,
}

impl Classes {
    fn controller() -> Self {
        let local = vec![LOCAL_CLASS.to_string()];
        Self {
            primary_group: CONTROLLER_GROUP.to_string(),
            os_classes: local.clone(),
            os_class_names: local.clone(),
            sub_groups: local.clone(),
            sub_group_names: local,
        }
    }
}

/// Builds host records against fixed classification maps
pub struct RecordBuilder<'a> {
    os_class_map: &'a ClassificationMap,
    sub_group_map: &'a ClassificationMap,
    environment_domain: &'a str,
    site_directory: &'a Path,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> RecordBuilder<'a> {
    /// Create a builder
    pub fn new(
        os_class_map: &'a ClassificationMap,
        sub_group_map: &'a ClassificationMap,
        environment_domain: &'a str,
        site_directory: &'a Path,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            os_class_map,
            sub_group_map,
            environment_domain,
            site_directory,
            sink,
        }
    }

    /// Build the record for one host.
    ///
    /// Returns `None` when the host name has no `-` separator and is not
    /// `localhost`; such hosts cannot be classified and are left out.
    pub fn build(&self, identity: &HostIdentity) -> Option<HostRecord> {
        let name = resolve_name(identity);
        let default_group_path = identity
            .definition_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let classes = if name == LOCALHOST {
            Classes::controller()
        } else {
            if !name.contains('-') {
                self.sink.report(Diagnostic::HostSkipped { name });
                return None;
            }
            let segments: Vec<&str> = name.split('-').collect();
            let os_code = segments[0];
            let sub_code = segments.get(1).copied().unwrap_or(FALLBACK_SUB_GROUP);
            self.classify(os_code, sub_code, &default_group_path)
        };
        self.sink.report(Diagnostic::RecordBuilt { name: name.clone() });

        let base = self.base_vars(identity, &name, &classes, &default_group_path);
        let declared = self.declared_vars(&identity.definition_file);
        let mut vars = merge(&base, &declared);
        derive_connection(&mut vars, &name, &identity.short_name);

        Some(HostRecord {
            hostname: identity.short_name.clone(),
            fqdn: name,
            primary_group: classes.primary_group,
            os_classes: classes.os_classes,
            os_class_names: classes.os_class_names,
            sub_groups: classes.sub_groups,
            sub_group_names: classes.sub_group_names,
            definition_file: identity.definition_file.clone(),
            vars,
        })
    }

    fn classify(&self, os_code: &str, sub_code: &str, default_group_path: &Path) -> Classes {
        let (os_classes, os_class_names) = self.os_class_map.resolve(os_code);
        let (sub_groups, sub_group_names) = self.sub_group_map.resolve(sub_code);

        Classes {
            primary_group: default_group_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            os_classes,
            os_class_names,
            sub_groups,
            sub_group_names,
        }
    }

    fn base_vars(
        &self,
        identity: &HostIdentity,
        name: &str,
        classes: &Classes,
        default_group_path: &Path,
    ) -> Vars {
        let mut vars = Vars::new();
        vars.insert("primary_group".into(), classes.primary_group.clone().into());
        vars.insert("os_classes".into(), classes.os_classes.clone().into());
        vars.insert("os_class_names".into(), classes.os_class_names.clone().into());
        vars.insert("sub_groups".into(), classes.sub_groups.clone().into());
        vars.insert("sub_group_names".into(), classes.sub_group_names.clone().into());
        vars.insert("hostname".into(), identity.short_name.clone().into());
        vars.insert("fqdn".into(), name.into());
        vars.insert("definition_file".into(), path_value(&identity.definition_file));
        vars.insert("default_group_path".into(), path_value(default_group_path));
        vars.insert("site_directory".into(), path_value(self.site_directory));
        vars.insert("environment_domain".into(), self.environment_domain.into());
        vars.insert("ansible_host".into(), name.into());
        vars
    }

    fn declared_vars(&self, path: &Path) -> Vars {
        let declared = match DefinitionPayload::read(path) {
            Ok(payload) => payload.into_vars(),
            Err(InventoryError::DefinitionShape { path, message }) => {
                self.sink.report(Diagnostic::DefinitionShape { path, message });
                return Vars::new();
            }
            Err(e) => {
                self.sink.report(Diagnostic::DefinitionUnreadable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
                return Vars::new();
            }
        };

        // Output formats only accept string keys.
        let (declared, dropped) = string_keyed(&declared);
        for message in dropped {
            self.sink.report(Diagnostic::DefinitionShape {
                path: path.to_path_buf(),
                message,
            });
        }
        declared
    }
}

/// Name used for classification and addressing.
///
/// A definition path containing `child@parent` makes the host reachable
/// through its parent: the name becomes `{parent}:{fqdn}`, where `parent` is
/// the segment after the `@` with its last dot-separated label removed.
pub fn resolve_name(identity: &HostIdentity) -> String {
    let path = identity.definition_file.to_string_lossy();
    match path.split('@').nth(1) {
        Some(segment) => {
            let parent = segment.rsplit_once('.').map_or("", |(head, _)| head);
            format!("{parent}:{}", identity.fqdn)
        }
        None => identity.fqdn.clone(),
    }
}

/// Set the SSH, WinRM and container addresses after the merge
fn derive_connection(vars: &mut Vars, name: &str, short_name: &str) {
    match vars.get("ansible_real_host").filter(|v| is_truthy(v)).cloned() {
        Some(real_host) => {
            vars.insert("ansible_ssh_host".into(), real_host);
        }
        None => {
            vars.insert("ansible_ssh_host".into(), name.into());
            vars.insert("ansible_winrm_host".into(), name.into());
        }
    }

    match SystemType::of(vars) {
        SystemType::Lxd => {
            let lxd_host = vars
                .get("lxd_host")
                .filter(|v| is_truthy(v))
                .and_then(scalar_to_string);
            if let Some(lxd_host) = lxd_host {
                vars.insert(
                    "ansible_host".into(),
                    format!("{lxd_host}:{short_name}").into(),
                );
            }
        }
        SystemType::Qemu => {
            vars.insert("ansible_host".into(), short_name.into());
            vars.insert("ansible_ssh_host".into(), short_name.into());
        }
        SystemType::Other => {}
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}
