mod builtin;
mod console;

use crate::commands::{
    BoundCommand, CommandRegistrar, CommandSender, CommandService, RegistrationError,
    ResolverRegistry, StaticDirectory,
};
use crate::config::HubConfig;
use crate::consumer_config::TomlConsumerConfig;
use crate::permissions::InMemoryPermissions;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::io::{self, BufRead, Write};
use std::iter;
use std::sync::mpsc;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use tracing::{debug, info, warn};

pub use builtin::{ADMIN_PERMISSION, OWNER as BUILTIN_OWNER};
pub use console::ConsoleSender;

pub const UNKNOWN_COMMAND_MESSAGE: &str = "Unknown command. Type \"cmdhub help\" for help.";

/// One exposed root as the host sees it.
#[derive(Clone)]
pub struct CommandEntry {
    pub label: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub command: BoundCommand,
}

/// Labels and aliases the host answers to. Primary labels take precedence
/// over aliases; otherwise the first registration of a name keeps it.
#[derive(Default)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
    labels: FxHashMap<String, (usize, bool)>,
}

impl CommandTable {
    pub fn get(&self, label: &str) -> Option<&CommandEntry> {
        let (index, _) = self.labels.get(&label.to_lowercase())?;
        self.entries.get(*index)
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels and aliases starting with `prefix`, case-insensitively.
    pub fn complete_label(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.entries
            .iter()
            .flat_map(|entry| iter::once(&entry.label).chain(&entry.aliases))
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .unique_by(|name| name.to_lowercase())
            .sorted_by_key(|name| name.to_lowercase())
            .cloned()
            .collect()
    }

    fn claim(&mut self, name: &str, index: usize, primary: bool) {
        match self.labels.entry(name.to_lowercase()) {
            Entry::Vacant(entry) => {
                entry.insert((index, primary));
            }
            Entry::Occupied(mut entry) => {
                let (taken_by, taken_as_primary) = *entry.get();
                if primary && !taken_as_primary {
                    entry.insert((index, primary));
                } else {
                    let holder = self
                        .entries
                        .get(taken_by)
                        .map(|entry| entry.label.as_str())
                        .unwrap_or_default();
                    warn!("Label '{}' is already taken by /{}", name, holder);
                }
            }
        }
    }
}

impl CommandRegistrar for CommandTable {
    fn register(&mut self, label: &str, description: &str, aliases: &[String], command: BoundCommand) {
        let index = self.entries.len();
        self.claim(label, index, true);
        for alias in aliases {
            self.claim(alias, index, false);
        }
        self.entries.push(CommandEntry {
            label: label.to_string(),
            aliases: aliases.to_vec(),
            description: description.to_string(),
            command,
        });
    }
}

enum Message {
    Line(String),
    Shutdown,
}

/// A console application exposing every registered module's commands.
pub struct Host {
    config: HubConfig,
    service: Arc<CommandService>,
    table: RwLock<CommandTable>,
    console: ConsoleSender,
}

impl Host {
    /// Registers the built-in `cmdhub` module and exposes every root already
    /// registered with `service`.
    pub fn new(config: HubConfig, service: Arc<CommandService>) -> Result<Arc<Host>, RegistrationError> {
        let host = Arc::new(Host {
            console: ConsoleSender::new(config.console_name.clone()),
            config,
            service,
            table: RwLock::new(CommandTable::default()),
        });
        builtin::register(&host)?;
        host.refresh();
        Ok(host)
    }

    /// A host whose modules read their config below `data_dir` and whose
    /// permissions live in memory.
    pub fn with_defaults(config: HubConfig) -> Result<Arc<Host>, RegistrationError> {
        let resolvers = ResolverRegistry::with_builtins(Arc::new(StaticDirectory::default()));
        let consumer_config = Arc::new(TomlConsumerConfig::new(&config.data_dir));
        let permissions = Arc::new(InMemoryPermissions::new());
        let service = CommandService::new(resolvers, consumer_config, permissions);
        Self::new(config, Arc::new(service))
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<CommandService> {
        &self.service
    }

    pub fn console(&self) -> &ConsoleSender {
        &self.console
    }

    fn table(&self) -> RwLockReadGuard<'_, CommandTable> {
        self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn table_mut(&self) -> RwLockWriteGuard<'_, CommandTable> {
        self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Re-snapshots every registered root. Alias and disable-primary config
    /// changes only take effect here.
    pub fn refresh(&self) -> usize {
        let mut table = CommandTable::default();
        let count = self.service.register_into(&mut table);
        *self.table_mut() = table;
        info!("Exposing {} command(s)", count);
        count
    }

    pub fn command(&self, label: &str) -> Option<BoundCommand> {
        self.table().get(label).map(|entry| entry.command.clone())
    }

    /// Exposed roots sorted by label.
    pub fn entries(&self) -> Vec<CommandEntry> {
        self.table()
            .entries()
            .iter()
            .cloned()
            .sorted_by_key(|entry| entry.label.to_lowercase())
            .collect()
    }

    pub fn complete_label(&self, prefix: &str) -> Vec<String> {
        self.table().complete_label(prefix)
    }

    /// Dispatches `label args...`. The table lock is released before the
    /// command runs, so handlers may refresh the host.
    pub fn dispatch_line(&self, sender: &dyn CommandSender, line: &str) {
        let mut tokens = line.split_whitespace();
        let Some(label) = tokens.next() else {
            return;
        };
        let label = label.strip_prefix('/').unwrap_or(label);
        let args = tokens.collect_vec();
        match self.command(label) {
            Some(command) => {
                debug!("{} issued command: {}", sender.name(), line.trim());
                command.execute(sender, &args);
            }
            None => sender.send_error(UNKNOWN_COMMAND_MESSAGE),
        }
    }

    /// Completions for the last token of `line`. A trailing space starts a
    /// new, empty token.
    pub fn complete_line(&self, sender: &dyn CommandSender, line: &str) -> Vec<String> {
        let mut tokens = line.split_whitespace().collect_vec();
        let new_token = line.ends_with(char::is_whitespace);
        if tokens.is_empty() {
            return self.complete_label("");
        }
        let label = tokens.remove(0);
        let label = label.strip_prefix('/').unwrap_or(label);
        if tokens.is_empty() && !new_token {
            return self.complete_label(label);
        }
        if new_token {
            tokens.push("");
        }
        match self.command(label) {
            Some(command) => command.suggest(sender, &tokens),
            None => Vec::new(),
        }
    }

    fn handle_line(&self, line: &str) {
        let line = line.trim_start();
        let prefix = self.config.completion_prefix.as_str();
        match line.strip_prefix(prefix) {
            Some(rest) if !prefix.is_empty() => {
                let suggestions = self.complete_line(&self.console, rest);
                if suggestions.is_empty() {
                    println!("(no suggestions)");
                } else {
                    println!("{}", suggestions.join("  "));
                }
            }
            _ => self.dispatch_line(&self.console, line),
        }
    }

    /// Reads commands from stdin until it closes or ctrl-c is pressed.
    pub fn run(&self) -> io::Result<()> {
        let (tx, rx) = mpsc::channel();

        let ctrl_handler_sender = tx.clone();
        if let Err(err) = ctrlc::set_handler(move || {
            let _ = ctrl_handler_sender.send(Message::Shutdown);
        }) {
            warn!("Could not set the ctrl-c handler: {}", err);
        }

        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(Message::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        warn!("Could not read from stdin: {}", err);
                        break;
                    }
                }
            }
            let _ = tx.send(Message::Shutdown);
        });

        info!("Ready. Type \"cmdhub help\" for help.");
        self.print_prompt()?;
        while let Ok(Message::Line(line)) = rx.recv() {
            self.handle_line(&line);
            self.print_prompt()?;
        }

        self.shutdown();
        Ok(())
    }

    fn print_prompt(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", self.config.prompt)?;
        stdout.flush()
    }

    pub fn shutdown(&self) {
        info!("Shutting down...");
        *self.table_mut() = CommandTable::default();
        self.service.shutdown();
    }
}
