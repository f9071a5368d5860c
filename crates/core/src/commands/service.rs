use crate::commands::{
    ModuleId,
    context::CommandSender,
    error::RegistrationError,
    executor::ExecutionEngine,
    node::CommandNode,
    registry::CommandRegistry,
    resolver::ResolverRegistry,
};
use crate::consumer_config::ConsumerConfig;
use crate::permissions::{PermissionRegistry, register_from_registry};
use dashmap::{DashMap, mapref::entry::Entry};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use std::sync::Arc;
use tracing::{debug, info, warn};

type OwnerRegistries = DashMap<ModuleId, Arc<CommandRegistry>>;

/// Re-reads the current root node from its owner's registry on every call, so
/// a module that re-registers is picked up without touching the host.
#[derive(Clone)]
pub struct RootSupplier {
    registries: Arc<OwnerRegistries>,
    owner: ModuleId,
    root_name: String,
}

impl RootSupplier {
    pub fn get(&self) -> Option<Arc<CommandNode>> {
        let registry = self.registries.get(&self.owner)?;
        registry.get_root(&self.root_name).cloned()
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }
}

/// Label and aliases of one root, resolved against config at snapshot time.
#[derive(Clone)]
pub struct RootInfo {
    pub owner: ModuleId,
    pub label: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub supplier: RootSupplier,
}

/// What the host keeps per exposed root label.
#[derive(Clone)]
pub struct BoundCommand {
    owner: ModuleId,
    label: String,
    supplier: RootSupplier,
    engine: Arc<ExecutionEngine>,
}

impl BoundCommand {
    pub fn owner(&self) -> &ModuleId {
        &self.owner
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn root(&self) -> Option<Arc<CommandNode>> {
        self.supplier.get()
    }

    pub fn execute(&self, sender: &dyn CommandSender, args: &[&str]) {
        match self.supplier.get() {
            Some(root) => self
                .engine
                .execute(&self.owner, sender, &self.label, &root, args),
            None => sender.send_error("This command is not available."),
        }
    }

    /// Name and description of every subcommand of the root the sender may see.
    pub fn subcommands(&self, sender: &dyn CommandSender) -> Vec<(String, Option<String>)> {
        let Some(root) = self.supplier.get() else {
            return Vec::new();
        };
        self.engine
            .visible_subcommands(&self.owner, sender, &root, &root)
            .into_iter()
            .map(|child| {
                (
                    child.name().to_string(),
                    child.get_description().map(str::to_string),
                )
            })
            .collect()
    }

    pub fn suggest(&self, sender: &dyn CommandSender, args: &[&str]) -> Vec<String> {
        match self.supplier.get() {
            Some(root) => self.engine.suggest(&self.owner, sender, &root, args),
            None => Vec::new(),
        }
    }
}

/// The host side of command registration.
pub trait CommandRegistrar {
    fn register(&mut self, label: &str, description: &str, aliases: &[String], command: BoundCommand);
}

/// Owns every module's command tree and keeps root names unique across modules.
pub struct CommandService {
    owner_of_root: DashMap<String, ModuleId>,
    registry_of_owner: Arc<OwnerRegistries>,
    engine: Arc<ExecutionEngine>,
    config: Arc<dyn ConsumerConfig>,
    permissions: Arc<dyn PermissionRegistry>,
}

impl CommandService {
    pub fn new(
        resolvers: ResolverRegistry,
        config: Arc<dyn ConsumerConfig>,
        permissions: Arc<dyn PermissionRegistry>,
    ) -> Self {
        let engine = ExecutionEngine::new(Arc::new(resolvers), config.clone());
        Self {
            owner_of_root: DashMap::new(),
            registry_of_owner: Arc::new(DashMap::new()),
            engine: Arc::new(engine),
            config,
            permissions,
        }
    }

    pub fn engine(&self) -> &Arc<ExecutionEngine> {
        &self.engine
    }

    /// Claims every root of `registry` for `owner` and replaces the module's
    /// previous registry. Either all roots are claimed or none: on a conflict
    /// the claims made by this call are released again and the module keeps
    /// whatever it had registered before. Two concurrent calls that contest
    /// the same roots in opposite order may both fail.
    pub fn register(
        &self,
        owner: &ModuleId,
        registry: CommandRegistry,
    ) -> Result<(), RegistrationError> {
        let mut claimed: Vec<String> = Vec::new();
        for root in registry.roots() {
            let key = root.name().to_lowercase();
            match self.owner_of_root.entry(key.clone()) {
                Entry::Occupied(entry) => {
                    if entry.get() != owner {
                        let existing = entry.get().clone();
                        drop(entry);
                        self.release(owner, &claimed);
                        return Err(RegistrationError::Conflict {
                            root: root.name().to_string(),
                            owner: existing,
                        });
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(owner.clone());
                    claimed.push(key);
                }
            }
        }

        let declared = register_from_registry(owner, &registry, self.permissions.as_ref());
        if declared > 0 {
            debug!("Declared {} permissions for {}", declared, owner);
        }

        let root_count = registry.len();
        let registry = Arc::new(registry);
        let previous = self
            .registry_of_owner
            .insert(owner.clone(), registry.clone());
        if let Some(previous) = previous {
            // Roots the module dropped on re-registration become free again.
            let stale = previous
                .root_names()
                .filter(|name| registry.get_root(name).is_none())
                .map(str::to_lowercase)
                .collect_vec();
            self.release(owner, &stale);
        }

        info!("Registered {} root command(s) for {}", root_count, owner);
        Ok(())
    }

    /// Drops the module's registry and frees every root name it owned.
    pub fn unregister_all(&self, owner: &ModuleId) {
        let Some((_, removed)) = self.registry_of_owner.remove(owner) else {
            return;
        };
        let keys = removed.root_names().map(str::to_lowercase).collect_vec();
        self.release(owner, &keys);
        info!("Unregistered {} root command(s) of {}", keys.len(), owner);
    }

    pub fn shutdown(&self) {
        self.registry_of_owner.clear();
        self.owner_of_root.clear();
    }

    fn release(&self, owner: &ModuleId, keys: &[String]) {
        for key in keys {
            self.owner_of_root
                .remove_if(key, |_, current| current == owner);
        }
    }

    pub fn owner_of(&self, root: &str) -> Option<ModuleId> {
        self.owner_of_root
            .get(&root.to_lowercase())
            .map(|owner| owner.clone())
    }

    pub fn registry_of(&self, owner: &ModuleId) -> Option<Arc<CommandRegistry>> {
        self.registry_of_owner.get(owner).map(|r| r.clone())
    }

    /// Every registered module with the names of its roots, sorted by module.
    pub fn modules(&self) -> Vec<(ModuleId, Vec<String>)> {
        self.registry_of_owner
            .iter()
            .map(|entry| {
                let roots = entry.value().root_names().map(str::to_string).sorted().collect();
                (entry.key().clone(), roots)
            })
            .sorted_by(|a, b| a.0.name().cmp(b.0.name()))
            .collect()
    }

    /// Resolves label and aliases of every registered root. Config is read
    /// once here; later config edits need a new snapshot.
    pub fn snapshot_roots(&self) -> Vec<RootInfo> {
        let registries = self
            .registry_of_owner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .sorted_by(|a, b| a.0.name().cmp(b.0.name()))
            .collect_vec();

        let mut out: IndexMap<String, RootInfo> = IndexMap::new();
        for (owner, registry) in registries {
            for root in registry.roots() {
                let key = root.name().to_lowercase();
                if out.contains_key(&key) {
                    warn!(
                        "Root command '{}' of {} is shadowed by another module",
                        root.name(),
                        owner
                    );
                    continue;
                }
                let info = self.resolve_root(&owner, root);
                out.insert(key, info);
            }
        }
        out.into_values().collect()
    }

    /// Hands every resolved root to the host registrar.
    pub fn register_into(&self, registrar: &mut dyn CommandRegistrar) -> usize {
        let roots = self.snapshot_roots();
        let count = roots.len();
        for info in roots {
            let command = BoundCommand {
                owner: info.owner.clone(),
                label: info.label.clone(),
                supplier: info.supplier.clone(),
                engine: self.engine.clone(),
            };
            registrar.register(&info.label, &info.description, &info.aliases, command);
        }
        count
    }

    fn resolve_root(&self, owner: &ModuleId, root: &CommandNode) -> RootInfo {
        let aliases = self.resolve_root_aliases(owner, root);
        let disable_primary = self.resolve_disable_primary(owner, root);

        let (label, aliases) = match aliases.split_first() {
            Some((primary, rest)) if disable_primary => {
                let rest = rest
                    .iter()
                    .filter(|alias| !alias.eq_ignore_ascii_case(primary))
                    .cloned()
                    .collect();
                (primary.clone(), rest)
            }
            None if disable_primary => {
                warn!(
                    "Command '{}' of {} has disablePrimary=true but no aliases were found. Falling back to primary command registration.",
                    root.name(),
                    owner
                );
                (root.name().to_string(), aliases)
            }
            _ => (root.name().to_string(), aliases),
        };

        RootInfo {
            owner: owner.clone(),
            label,
            aliases,
            description: root.get_description().unwrap_or_default().to_string(),
            supplier: RootSupplier {
                registries: self.registry_of_owner.clone(),
                owner: owner.clone(),
                root_name: root.name().to_string(),
            },
        }
    }

    /// Config list wins when it has any usable entry, otherwise the root's
    /// static aliases followed by the extra root-toggle aliases.
    fn resolve_root_aliases(&self, owner: &ModuleId, root: &CommandNode) -> Vec<String> {
        let settings = root.root_settings();
        if let Some(template) = &settings.alias_path_template {
            let path = template.replace("{root}", root.name());
            let from_config =
                self.config
                    .read_string_list(owner, &settings.config_source, &path);
            let sanitized = sanitize_aliases(from_config);
            if !sanitized.is_empty() {
                return sanitized;
            }
        }

        sanitize_aliases(
            root.aliases()
                .iter()
                .chain(settings.extra_aliases.iter())
                .cloned(),
        )
    }

    fn resolve_disable_primary(&self, owner: &ModuleId, root: &CommandNode) -> bool {
        let settings = root.root_settings();
        if let Some(template) = &settings.disable_primary_path_template {
            let path = template.replace("{root}", root.name());
            if let Some(disable) = self.config.read_bool(owner, &settings.config_source, &path) {
                return disable;
            }
        }
        settings.disable_primary
    }
}

/// Trims, drops blanks and removes duplicates, keeping first-seen order.
pub(crate) fn sanitize_aliases(aliases: impl IntoIterator<Item = String>) -> Vec<String> {
    aliases
        .into_iter()
        .map(|alias| alias.trim().to_string())
        .filter(|alias| !alias.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
