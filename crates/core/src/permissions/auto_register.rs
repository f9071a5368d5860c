use super::{PermissionDefault, PermissionRegistry};
use crate::commands::{CommandNode, CommandRegistry, ModuleId};
use indexmap::IndexMap;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Every non-blank permission in `registry`, breadth first. The first node
/// declaring an identifier decides its default.
pub fn collect_permissions(registry: &CommandRegistry) -> IndexMap<String, PermissionDefault> {
    let mut found: IndexMap<String, PermissionDefault> = IndexMap::new();
    let mut queue: VecDeque<&CommandNode> = registry.roots().map(|root| &**root).collect();

    while let Some(node) = queue.pop_front() {
        if let Some(permission) = node.permission().map(str::trim) {
            if !permission.is_empty() {
                found
                    .entry(permission.to_string())
                    .or_insert(node.get_permission_default());
            }
        }
        queue.extend(node.children());
    }
    found
}

/// Declares every permission of `registry` the host does not know yet.
/// Returns how many were declared.
pub fn register_from_registry(
    owner: &ModuleId,
    registry: &CommandRegistry,
    permissions: &dyn PermissionRegistry,
) -> usize {
    let mut declared = 0;
    for (permission, default) in collect_permissions(registry) {
        match permissions.declared_default(&permission) {
            None => {
                permissions.declare(&permission, default);
                debug!("Declared permission {} ({}) for {}", permission, default, owner);
                declared += 1;
            }
            Some(existing) if existing != default => {
                warn!(
                    "Permission {} of {} is declared as '{}' but is already registered as '{}'; keeping '{}'",
                    permission, owner, default, existing, existing
                );
            }
            Some(_) => {}
        }
    }
    declared
}
