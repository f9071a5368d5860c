#![allow(dead_code)]

use cmdhub_core::commands::{
    CommandRegistry, CommandSender, CommandService, ModuleId, ResolverRegistry, StaticDirectory,
};
use cmdhub_core::consumer_config::{ConfigSource, ConsumerConfig};
use cmdhub_core::permissions::{InMemoryPermissions, PermissionDefault, PermissionRegistry, PermissionSet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every line sent to it.
pub struct RecordingSender {
    name: String,
    player: bool,
    permissions: PermissionSet,
    messages: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingSender {
    pub fn player(name: &str) -> RecordingSender {
        RecordingSender {
            name: name.to_string(),
            player: true,
            permissions: PermissionSet::new(),
            messages: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn console() -> RecordingSender {
        RecordingSender {
            player: false,
            permissions: PermissionSet::all(),
            ..RecordingSender::player("CONSOLE")
        }
    }

    pub fn grant(mut self, permission: &str) -> RecordingSender {
        self.permissions.grant(permission);
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
        self.errors.lock().unwrap().clear();
    }
}

impl CommandSender for RecordingSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_player(&self) -> bool {
        self.player
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.get_node_val(permission).unwrap_or(false)
    }

    fn send_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn send_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Clone, Debug)]
enum Entry {
    List(Vec<String>),
    Bool(bool),
}

/// In-memory module config keyed by module, file and dotted path.
#[derive(Default)]
pub struct MapConfig {
    entries: Mutex<HashMap<(String, String, String), Entry>>,
    reads: AtomicUsize,
}

impl MapConfig {
    pub fn new() -> Arc<MapConfig> {
        Arc::new(MapConfig::default())
    }

    pub fn set_list(&self, module: &str, path: &str, values: &[&str]) {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.insert(module, ConfigSource::default().file_name(), path, Entry::List(values));
    }

    pub fn set_bool(&self, module: &str, path: &str, value: bool) {
        self.insert(module, ConfigSource::default().file_name(), path, Entry::Bool(value));
    }

    pub fn set_bool_in(&self, module: &str, file: &str, path: &str, value: bool) {
        self.insert(module, file, path, Entry::Bool(value));
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn insert(&self, module: &str, file: &str, path: &str, entry: Entry) {
        self.entries
            .lock()
            .unwrap()
            .insert((module.to_string(), file.to_string(), path.to_string()), entry);
    }

    fn get(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Option<Entry> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let key = (
            owner.name().to_string(),
            source.file_name().to_string(),
            path.to_string(),
        );
        self.entries.lock().unwrap().get(&key).cloned()
    }
}

impl ConsumerConfig for MapConfig {
    fn read_string_list(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Vec<String> {
        match self.get(owner, source, path) {
            Some(Entry::List(values)) => values,
            _ => Vec::new(),
        }
    }

    fn read_bool(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Option<bool> {
        match self.get(owner, source, path) {
            Some(Entry::Bool(value)) => Some(value),
            _ => None,
        }
    }
}

/// Counts every declaration that reached the host.
#[derive(Default)]
pub struct CountingPermissions {
    inner: InMemoryPermissions,
    declarations: AtomicUsize,
}

impl CountingPermissions {
    pub fn declarations(&self) -> usize {
        self.declarations.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl PermissionRegistry for CountingPermissions {
    fn declared_default(&self, permission: &str) -> Option<PermissionDefault> {
        self.inner.declared_default(permission)
    }

    fn declare(&self, permission: &str, default: PermissionDefault) {
        self.declarations.fetch_add(1, Ordering::SeqCst);
        self.inner.declare(permission, default);
    }
}

pub struct Fixture {
    pub service: Arc<CommandService>,
    pub config: Arc<MapConfig>,
    pub permissions: Arc<CountingPermissions>,
}

impl Fixture {
    pub fn new() -> Fixture {
        let directory = StaticDirectory {
            players: vec!["Alice".to_string(), "albert".to_string(), "Bob".to_string()],
            worlds: vec!["world".to_string(), "world_nether".to_string(), "lobby".to_string()],
        };
        Fixture::with_resolvers(ResolverRegistry::with_builtins(Arc::new(directory)))
    }

    pub fn with_resolvers(resolvers: ResolverRegistry) -> Fixture {
        let config = MapConfig::new();
        let permissions = Arc::new(CountingPermissions::default());
        let service = Arc::new(CommandService::new(
            resolvers,
            config.clone(),
            permissions.clone(),
        ));
        Fixture {
            service,
            config,
            permissions,
        }
    }

    /// Registers `registry` for `module`, panicking on conflicts.
    pub fn register(&self, module: &str, registry: CommandRegistry) -> ModuleId {
        let owner = ModuleId::new(module);
        self.service.register(&owner, registry).unwrap();
        owner
    }

    pub fn execute(&self, sender: &dyn CommandSender, label: &str, args: &[&str]) {
        let owner = self
            .service
            .owner_of(label)
            .unwrap_or_else(|| panic!("no owner for {}", label));
        let registry = self.service.registry_of(&owner).unwrap();
        let root = registry.get_root(label).unwrap().clone();
        self.service
            .engine()
            .execute(&owner, sender, label, &root, args);
    }

    pub fn suggest(&self, sender: &dyn CommandSender, label: &str, args: &[&str]) -> Vec<String> {
        let owner = self.service.owner_of(label).unwrap();
        let registry = self.service.registry_of(&owner).unwrap();
        let root = registry.get_root(label).unwrap().clone();
        self.service.engine().suggest(&owner, sender, &root, args)
    }
}

pub fn single(root: cmdhub_core::commands::CommandNode) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(root);
    registry
}
