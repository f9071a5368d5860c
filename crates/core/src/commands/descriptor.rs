//! Builds command trees from flat descriptors, one per declared path.
//!
//! Modules that keep their command declarations as data (one record per path
//! with handler, parameters and metadata) hand them to
//! [`CommandRegistry::from_descriptors`] instead of nesting builder calls.

use crate::commands::{
    argument::ParamSpec,
    node::{EnabledToggle, Executor, Suggester, VisibilityPolicy},
    registry::CommandRegistry,
};
use crate::consumer_config::ConfigSource;
use crate::permissions::PermissionDefault;
use tracing::debug;

/// Primary-label toggle declared on a root.
#[derive(Debug, Clone, Default)]
pub struct RootToggle {
    pub disable_primary: bool,
    pub disable_primary_path: Option<String>,
    pub aliases: Vec<String>,
}

/// Where the roots of one descriptor set read their config from.
#[derive(Debug, Clone)]
pub struct DescriptorSource {
    pub config_source: ConfigSource,
    pub alias_path_template: Option<String>,
}

impl Default for DescriptorSource {
    fn default() -> Self {
        Self {
            config_source: ConfigSource::default(),
            alias_path_template: Some(super::node::DEFAULT_ALIAS_PATH_TEMPLATE.to_string()),
        }
    }
}

#[derive(Clone, Default)]
pub struct CommandDescriptor {
    /// Whitespace separated literals, root first.
    pub path: String,
    pub description: Option<String>,
    pub permission: Option<String>,
    pub permission_default: PermissionDefault,
    pub visibility: VisibilityPolicy,
    pub aliases: Vec<String>,
    pub player_only: bool,
    pub show_to_console: bool,
    pub enabled: Option<EnabledToggle>,
    pub root_toggle: Option<RootToggle>,
    pub params: Vec<ParamSpec>,
    pub handler: Option<Executor>,
    pub suggester: Option<Suggester>,
}

impl CommandDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Descriptors that only carry a suggester leave the node's metadata alone.
    fn is_suggest_only(&self) -> bool {
        self.handler.is_none() && self.suggester.is_some()
    }
}

impl CommandRegistry {
    pub fn from_descriptors(
        source: &DescriptorSource,
        descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ) -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        for descriptor in descriptors {
            apply_descriptor(&mut registry, source, descriptor);
        }
        registry
    }
}

fn apply_descriptor(
    registry: &mut CommandRegistry,
    source: &DescriptorSource,
    descriptor: CommandDescriptor,
) {
    let Some(root_name) = descriptor.path.split_whitespace().next() else {
        debug!("Skipping command descriptor with a blank path");
        return;
    };

    let is_new_root = registry.get_root(root_name).is_none();
    if let Some(root) = registry.path_mut(root_name) {
        let settings = root.root_settings_mut();
        if is_new_root {
            settings.config_source = source.config_source.clone();
            settings.alias_path_template = source.alias_path_template.clone();
        }
        if let Some(toggle) = &descriptor.root_toggle {
            settings.disable_primary = toggle.disable_primary;
            if let Some(path) = &toggle.disable_primary_path {
                let path = path.trim();
                settings.disable_primary_path_template =
                    (!path.is_empty()).then(|| path.to_string());
            }
            settings.extra_aliases.extend(
                toggle
                    .aliases
                    .iter()
                    .map(|alias| alias.trim())
                    .filter(|alias| !alias.is_empty())
                    .map(str::to_string),
            );
        }
    }

    let suggest_only = descriptor.is_suggest_only();
    let Some(node) = registry.path_mut(&descriptor.path) else {
        return;
    };

    if let Some(suggester) = descriptor.suggester {
        node.set_suggester(suggester);
    }
    if suggest_only {
        return;
    }

    if let Some(description) = descriptor.description {
        node.description = Some(description);
    }
    if let Some(permission) = descriptor.permission {
        node.permission = Some(permission);
        node.permission_default = descriptor.permission_default;
    }
    node.visibility = descriptor.visibility;
    node.aliases.extend(
        descriptor
            .aliases
            .iter()
            .map(|alias| alias.trim())
            .filter(|alias| !alias.is_empty())
            .map(str::to_string),
    );
    if descriptor.player_only {
        node.player_only = true;
        node.hide_from_console = !descriptor.show_to_console;
    }
    if let Some(enabled) = descriptor.enabled {
        node.enabled = enabled;
    }
    if let Some(handler) = descriptor.handler {
        node.set_executor(handler, descriptor.params);
    }
}
