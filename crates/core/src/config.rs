use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml_edit::{DocumentMut, value};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("could not edit {path}: {source}")]
    Edit {
        path: PathBuf,
        #[source]
        source: Box<toml_edit::TomlError>,
    },
}

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, bool);

macro_rules! gen_config {
    (
        $( $(#[$doc:meta])* $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct HubConfig {
            $(
                $(#[$doc])*
                pub $name: $type,
            )*
        }

        impl Default for HubConfig {
            fn default() -> Self {
                HubConfig {
                    $( $name: $default, )*
                }
            }
        }

        impl HubConfig {
            /// Loads `config_file`, writing back any missing keys with their
            /// defaults. A missing file is created.
            pub fn load(config_file: impl AsRef<Path>) -> Result<HubConfig, ConfigError> {
                let path = config_file.as_ref();
                let str = match fs::read_to_string(path) {
                    Ok(str) => str,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
                    Err(source) => return Err(ConfigError::Io { path: path.to_owned(), source }),
                };
                let mut doc = str.parse::<DocumentMut>().map_err(|source| ConfigError::Edit {
                    path: path.to_owned(),
                    source: Box::new(source),
                })?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    let io_err = |source| ConfigError::Io { path: path.to_owned(), source };
                    let mut file = fs::OpenOptions::new()
                        .create(true)
                        .write(true)
                        .truncate(true)
                        .open(path)
                        .map_err(io_err)?;
                    write!(file, "{}", patched).map_err(io_err)?;
                }

                toml::from_str(&patched).map_err(|source| ConfigError::Parse {
                    path: path.to_owned(),
                    source: Box::new(source),
                })
            }
        }
    };
}

gen_config! {
    /// Directory holding one sub-directory of config files per module.
    data_dir: String = "modules".to_string(),
    /// Name the console principal reports.
    console_name: String = "CONSOLE".to_string(),
    prompt: String = "> ".to_string(),
    /// Lines starting with this print completions instead of dispatching.
    completion_prefix: String = "?".to_string()
}
