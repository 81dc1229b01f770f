//! In-memory group tree.
//!
//! [`GroupTree`] is a minimal inventory model: named groups holding hosts and
//! child groups, plus variables per host. It implements [`InventorySink`] so
//! a generated inventory can be registered into it and rendered as a graph.

use indexmap::{IndexMap, IndexSet};
use serde_yaml::Value;

use super::adapter::{register_inventory, InventorySink};
use super::assembler::InventoryOutput;
use crate::vars::Vars;

/// A group of hosts in the inventory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    /// Group name
    pub name: String,

    /// Host names belonging to this group
    pub hosts: IndexSet<String>,

    /// Child group names
    pub children: IndexSet<String>,
}

impl Group {
    /// Create a new group with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check if a host belongs to this group
    pub fn has_host(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Check if a group is a child of this group
    pub fn has_child(&self, child: &str) -> bool {
        self.children.contains(child)
    }
}

/// Groups, hosts and host variables
#[derive(Debug, Clone, Default)]
pub struct GroupTree {
    groups: IndexMap<String, Group>,
    hosts: IndexMap<String, Vars>,
}

impl GroupTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generated inventory under `root_group`
    pub fn from_output(output: &InventoryOutput, root_group: &str) -> Self {
        let mut tree = Self::new();
        register_inventory(output, root_group, &mut tree);
        tree
    }

    /// Get a group by name
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Variables registered for a host
    pub fn host_vars(&self, host: &str) -> Option<&Vars> {
        self.hosts.get(host)
    }

    /// All group names in registration order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of registered hosts
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    fn group_entry(&mut self, name: &str) -> &mut Group {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| Group::new(name))
    }

    /// Render the tree below `root` the way `ansible-inventory --graph` does
    pub fn render_graph(&self, root: &str) -> String {
        let mut out = String::new();
        let mut path = Vec::new();
        self.render_group(root, 0, &mut path, &mut out);
        out
    }

    fn render_group<'a>(
        &'a self,
        name: &'a str,
        depth: usize,
        path: &mut Vec<&'a str>,
        out: &mut String,
    ) {
        let indent = "  |".repeat(depth);
        let marker = if depth == 0 { "" } else { "--" };
        out.push_str(&format!("{indent}{marker}@{name}:\n"));

        // A group listed among its own ancestors would recurse forever.
        if path.contains(&name) {
            return;
        }
        let Some(group) = self.groups.get(name) else {
            return;
        };

        path.push(name);
        for child in &group.children {
            self.render_group(child, depth + 1, path, out);
        }
        let host_indent = "  |".repeat(depth + 1);
        for host in &group.hosts {
            out.push_str(&format!("{host_indent}--{host}\n"));
        }
        path.pop();
    }
}

impl InventorySink for GroupTree {
    fn add_group(&mut self, name: &str) {
        self.group_entry(name);
    }

    fn add_host(&mut self, name: &str) {
        self.hosts.entry(name.to_string()).or_default();
    }

    fn add_child(&mut self, parent: &str, child: &str) {
        self.group_entry(parent).children.insert(child.to_string());
    }

    fn add_host_to_group(&mut self, group: &str, host: &str) {
        self.group_entry(group).hosts.insert(host.to_string());
    }

    fn set_variable(&mut self, host: &str, key: &str, value: &Value) {
        self.hosts
            .entry(host.to_string())
            .or_default()
            .insert(Value::from(key), value.clone());
    }
}
