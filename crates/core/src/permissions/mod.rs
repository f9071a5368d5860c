mod auto_register;

use dashmap::DashMap;
use std::fmt;

pub use auto_register::{collect_permissions, register_from_registry};

/// Who holds a permission when nothing grants or denies it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionDefault {
    True,
    False,
    #[default]
    Op,
    NotOp,
}

impl PermissionDefault {
    pub fn grants(self, is_op: bool) -> bool {
        match self {
            PermissionDefault::True => true,
            PermissionDefault::False => false,
            PermissionDefault::Op => is_op,
            PermissionDefault::NotOp => !is_op,
        }
    }
}

impl fmt::Display for PermissionDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PermissionDefault::True => "true",
            PermissionDefault::False => "false",
            PermissionDefault::Op => "op",
            PermissionDefault::NotOp => "not op",
        };
        f.write_str(name)
    }
}

/// The host's permission system as seen by the command service.
pub trait PermissionRegistry: Send + Sync {
    fn declared_default(&self, permission: &str) -> Option<PermissionDefault>;

    /// Declaring an identifier that is already known must leave the first
    /// declaration in place.
    fn declare(&self, permission: &str, default: PermissionDefault);
}

#[derive(Debug, Default)]
pub struct InMemoryPermissions {
    declared: DashMap<String, PermissionDefault>,
}

impl InMemoryPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

impl PermissionRegistry for InMemoryPermissions {
    fn declared_default(&self, permission: &str) -> Option<PermissionDefault> {
        self.declared.get(permission).map(|entry| *entry)
    }

    fn declare(&self, permission: &str, default: PermissionDefault) {
        self.declared
            .entry(permission.to_string())
            .or_insert(default);
    }
}

#[derive(Debug)]
enum PathSegment {
    WildCard,
    Named(String),
}

#[derive(Debug)]
struct PermissionNode {
    path: Vec<PathSegment>,
    value: bool,
}

impl PermissionNode {
    fn matches(&self, str: &str) -> bool {
        let mut segments = str.split('.');
        for expected in &self.path {
            match (expected, segments.next()) {
                (PathSegment::WildCard, _) => return true,
                (PathSegment::Named(name), Some(segment)) => {
                    if name != segment {
                        return false;
                    }
                }
                (PathSegment::Named(_), None) => return false,
            }
        }
        segments.next().is_none()
    }
}

/// Explicit grants and denials of one principal. `*` matches any remaining
/// segments, so `shop.*` covers `shop.buy` and `shop.admin.reset`. The first
/// matching entry wins.
#[derive(Debug, Default)]
pub struct PermissionSet {
    nodes: Vec<PermissionNode>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set granting every permission.
    pub fn all() -> Self {
        let mut set = Self::new();
        set.grant("*");
        set
    }

    pub fn get_node_val(&self, name: &str) -> Option<bool> {
        self.nodes
            .iter()
            .find(|node| node.matches(name))
            .map(|node| node.value)
    }

    pub fn grant(&mut self, name: &str) {
        self.insert(name, true);
    }

    pub fn deny(&mut self, name: &str) {
        self.insert(name, false);
    }

    /// Explicit entries first, then the declared default of the permission.
    /// Undeclared permissions fall back to [`PermissionDefault::Op`].
    pub fn check(&self, name: &str, registry: &dyn PermissionRegistry, is_op: bool) -> bool {
        self.get_node_val(name).unwrap_or_else(|| {
            registry
                .declared_default(name)
                .unwrap_or_default()
                .grants(is_op)
        })
    }

    fn insert(&mut self, name: &str, value: bool) {
        let path = name
            .split('.')
            .map(|s| match s {
                "*" => PathSegment::WildCard,
                s => PathSegment::Named(s.to_owned()),
            })
            .collect();
        self.nodes.push(PermissionNode { path, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_matches_remaining_segments() {
        let mut set = PermissionSet::new();
        set.grant("shop.*");
        assert_eq!(set.get_node_val("shop.buy"), Some(true));
        assert_eq!(set.get_node_val("shop.admin.reset"), Some(true));
        assert_eq!(set.get_node_val("bank.open"), None);
    }

    #[test]
    fn named_nodes_need_the_full_path() {
        let mut set = PermissionSet::new();
        set.grant("shop.buy");
        assert_eq!(set.get_node_val("shop.buy"), Some(true));
        assert_eq!(set.get_node_val("shop"), None);
        assert_eq!(set.get_node_val("shop.buy.bulk"), None);
    }

    #[test]
    fn first_matching_entry_wins() {
        let mut set = PermissionSet::new();
        set.deny("shop.admin");
        set.grant("shop.*");
        assert_eq!(set.get_node_val("shop.admin"), Some(false));
        assert_eq!(set.get_node_val("shop.sell"), Some(true));
    }

    #[test]
    fn check_falls_back_to_declared_default() {
        let registry = InMemoryPermissions::new();
        registry.declare("shop.use", PermissionDefault::True);
        registry.declare("shop.guest", PermissionDefault::NotOp);
        let set = PermissionSet::new();

        assert!(set.check("shop.use", &registry, false));
        assert!(set.check("shop.guest", &registry, false));
        assert!(!set.check("shop.guest", &registry, true));
        assert!(!set.check("shop.unknown", &registry, false));
        assert!(set.check("shop.unknown", &registry, true));
    }

    #[test]
    fn declare_keeps_the_first_default() {
        let registry = InMemoryPermissions::new();
        registry.declare("a.b", PermissionDefault::True);
        registry.declare("a.b", PermissionDefault::False);
        assert_eq!(registry.declared_default("a.b"), Some(PermissionDefault::True));
        assert_eq!(registry.len(), 1);
    }
}
