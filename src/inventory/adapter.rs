//! Registration of a generated inventory with an inventory model.
//!
//! The orchestration host owns its own inventory object model; this module
//! only drives it through [`InventorySink`]. [`GroupTree`] is the in-crate
//! model used for the `--graph` view and in tests.
//!
//! [`GroupTree`]: super::group::GroupTree

use serde_yaml::Value;

use super::assembler::InventoryOutput;

/// Group that every derived group is linked under by default
pub const DEFAULT_ROOT_GROUP: &str = "site";

/// Inventory object model that hosts and groups are registered with
pub trait InventorySink {
    /// Register a group; registering an existing group is a no-op
    fn add_group(&mut self, name: &str);

    /// Register a host; registering an existing host is a no-op
    fn add_host(&mut self, name: &str);

    /// Nest a group under a parent group
    fn add_child(&mut self, parent: &str, child: &str);

    /// Make a host a member of a group
    fn add_host_to_group(&mut self, group: &str, host: &str);

    /// Set one variable on a host
    fn set_variable(&mut self, host: &str, key: &str, value: &Value);
}

/// Register every listed host with `sink`.
///
/// Each host joins its primary group, its sub-group and OS class groups and
/// any `extra_host_groups` it declares. Those groups are linked under
/// `root_group`, and every host variable is set on the host.
pub fn register_inventory(output: &InventoryOutput, root_group: &str, sink: &mut dyn InventorySink) {
    sink.add_group(root_group);

    for name in output.hosts() {
        let Some(record) = output.host_vars(name) else {
            continue;
        };
        sink.add_host(name);

        if record.primary_group.is_empty() {
            sink.add_host_to_group(root_group, name);
        } else {
            link(sink, root_group, &record.primary_group, name);
        }

        let derived = record
            .sub_groups
            .iter()
            .chain(&record.os_classes)
            .cloned()
            .chain(record.extra_host_groups());
        for group in derived {
            link(sink, root_group, &group, name);
        }

        for (key, value) in record.vars() {
            if let Some(key) = key.as_str() {
                sink.set_variable(name, key, value);
            }
        }
    }
}

fn link(sink: &mut dyn InventorySink, root_group: &str, group: &str, host: &str) {
    sink.add_group(group);
    sink.add_host_to_group(group, host);
    sink.add_child(root_group, group);
}
