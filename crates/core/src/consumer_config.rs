//! Per-module configuration as seen by the command service: string lists and
//! booleans at dotted paths inside a module's own config file.

use crate::commands::ModuleId;
use crate::config::ConfigError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Which of the owning module's config files a root reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    file: Option<String>,
}

impl ConfigSource {
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        Self {
            file: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    pub fn file_name(&self) -> &str {
        self.file.as_deref().unwrap_or(DEFAULT_CONFIG_FILE)
    }
}

/// Read access to module configuration. Lookups never fail: a missing file,
/// a missing key or a value of the wrong type all read as absent.
pub trait ConsumerConfig: Send + Sync {
    fn read_string_list(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Vec<String>;

    fn read_bool(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Option<bool>;
}

/// Reads `<data_dir>/<module>/<file>` on every lookup, so edits apply without
/// a reload.
#[derive(Debug, Clone)]
pub struct TomlConsumerConfig {
    data_dir: PathBuf,
}

impl TomlConsumerConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_of(&self, owner: &ModuleId, source: &ConfigSource) -> PathBuf {
        self.data_dir.join(owner.name()).join(source.file_name())
    }

    fn load(&self, owner: &ModuleId, source: &ConfigSource) -> Result<Option<Table>, ConfigError> {
        let path = self.path_of(owner, source);
        let str = match fs::read_to_string(&path) {
            Ok(str) => str,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        let table = toml::from_str::<Table>(&str).map_err(|source| ConfigError::Parse {
            path,
            source: Box::new(source),
        })?;
        Ok(Some(table))
    }

    fn lookup(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Option<Value> {
        let table = match self.load(owner, source) {
            Ok(table) => table?,
            Err(err) => {
                debug!("Ignoring config of {}: {}", owner, err);
                return None;
            }
        };
        lookup_dotted(&table, path).cloned()
    }
}

impl ConsumerConfig for TomlConsumerConfig {
    fn read_string_list(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Vec<String> {
        match self.lookup(owner, source, path) {
            Some(Value::Array(values)) => values.iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        }
    }

    fn read_bool(&self, owner: &ModuleId, source: &ConfigSource, path: &str) -> Option<bool> {
        self.lookup(owner, source, path)?.as_bool()
    }
}

fn lookup_dotted<'a>(table: &'a Table, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = table.get(segments.next()?)?;
    for segment in segments {
        current = current.as_table()?.get(segment)?;
    }
    Some(current)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
