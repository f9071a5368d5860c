use crate::commands::{
    argument::{ArgumentType, ParamSpec},
    context::{CommandSender, ExecutionContext},
    error::CommandResult,
};
use crate::consumer_config::ConfigSource;
use crate::permissions::PermissionDefault;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

pub type Executor = Arc<dyn Fn(&mut ExecutionContext<'_>) -> CommandResult<()> + Send + Sync>;

/// Custom completion bound to a node. Receives the invoking sender, the name of
/// the root the node belongs to and every raw token typed after the root label.
pub type Suggester = Arc<dyn Fn(&dyn CommandSender, &str, &[&str]) -> Vec<String> + Send + Sync>;

pub const DEFAULT_ALIAS_PATH_TEMPLATE: &str = "commands.{root}.aliases";
pub const DEFAULT_DISABLE_PRIMARY_PATH_TEMPLATE: &str = "commands.{root}.disablePrimary";

/// Whether a node shows up in subcommand listings and completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityPolicy {
    #[default]
    Always,
    Hidden,
    /// Only listed for senders that could run the node right now.
    IfExecutable,
}

/// Runtime on/off switch of a node, optionally overridden by the owner's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledToggle {
    pub default: bool,
    /// Boolean path in the owner's config, `{root}` is replaced by the root name.
    pub config_path: Option<String>,
    pub hide_when_disabled: bool,
    pub disabled_message: Option<String>,
}

impl Default for EnabledToggle {
    fn default() -> Self {
        Self {
            default: true,
            config_path: None,
            hide_when_disabled: true,
            disabled_message: None,
        }
    }
}

/// Settings only consulted on root nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSettings {
    pub config_source: ConfigSource,
    pub alias_path_template: Option<String>,
    pub disable_primary: bool,
    pub disable_primary_path_template: Option<String>,
    pub extra_aliases: Vec<String>,
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            config_source: ConfigSource::default(),
            alias_path_template: Some(DEFAULT_ALIAS_PATH_TEMPLATE.to_string()),
            disable_primary: false,
            disable_primary_path_template: Some(DEFAULT_DISABLE_PRIMARY_PATH_TEMPLATE.to_string()),
            extra_aliases: Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct CommandNode {
    pub(super) name: String,
    pub(super) aliases: Vec<String>,
    pub(super) children: IndexMap<String, CommandNode>,
    pub(super) description: Option<String>,
    pub(super) permission: Option<String>,
    pub(super) permission_default: PermissionDefault,
    pub(super) visibility: VisibilityPolicy,
    pub(super) player_only: bool,
    pub(super) hide_from_console: bool,
    pub(super) enabled: EnabledToggle,
    pub(super) root: RootSettings,
    pub(super) executor: Option<Executor>,
    pub(super) params: Vec<ParamSpec>,
    pub(super) suggester: Option<Suggester>,
}

impl CommandNode {
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            children: IndexMap::new(),
            description: None,
            permission: None,
            permission_default: PermissionDefault::default(),
            visibility: VisibilityPolicy::default(),
            player_only: false,
            hide_from_console: true,
            enabled: EnabledToggle::default(),
            root: RootSettings::default(),
            executor: None,
            params: Vec::new(),
            suggester: None,
        }
    }

    /// Adds `child` as a subcommand. A child with the same literal is replaced.
    pub fn then(mut self, child: CommandNode) -> Self {
        self.children.insert(child.name.to_lowercase(), child);
        self
    }

    pub fn executes<F>(mut self, executor: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> CommandResult<()> + Send + Sync + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn argument(mut self, name: impl Into<String>, arg_type: ArgumentType) -> Self {
        self.params.push(ParamSpec::required(name, arg_type));
        self
    }

    pub fn optional_argument(mut self, name: impl Into<String>, arg_type: ArgumentType) -> Self {
        self.params.push(ParamSpec::optional(name, arg_type));
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn suggests<F>(mut self, suggester: F) -> Self
    where
        F: Fn(&dyn CommandSender, &str, &[&str]) -> Vec<String> + Send + Sync + 'static,
    {
        self.suggester = Some(Arc::new(suggester));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        let alias = alias.trim();
        if !alias.is_empty() {
            self.aliases.push(alias.to_string());
        }
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn require_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn permission_default(mut self, default: PermissionDefault) -> Self {
        self.permission_default = default;
        self
    }

    pub fn visibility(mut self, visibility: VisibilityPolicy) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn player_only(mut self) -> Self {
        self.player_only = true;
        self
    }

    /// Keeps a player-only node listed for non-player senders.
    pub fn show_to_console(mut self) -> Self {
        self.hide_from_console = false;
        self
    }

    pub fn enabled(mut self, toggle: EnabledToggle) -> Self {
        self.enabled = toggle;
        self
    }

    pub fn enabled_by_default(mut self, enabled: bool) -> Self {
        self.enabled.default = enabled;
        self
    }

    pub fn enabled_config_path(mut self, path: impl Into<String>) -> Self {
        self.enabled.config_path = non_blank(path.into());
        self
    }

    pub fn show_when_disabled(mut self) -> Self {
        self.enabled.hide_when_disabled = false;
        self
    }

    pub fn disabled_message(mut self, message: impl Into<String>) -> Self {
        self.enabled.disabled_message = non_blank(message.into());
        self
    }

    pub fn config_source(mut self, source: ConfigSource) -> Self {
        self.root.config_source = source;
        self
    }

    pub fn alias_path_template(mut self, template: Option<&str>) -> Self {
        self.root.alias_path_template = template.and_then(|t| non_blank(t.to_string()));
        self
    }

    pub fn disable_primary(mut self, disable: bool) -> Self {
        self.root.disable_primary = disable;
        self
    }

    pub fn disable_primary_path_template(mut self, template: Option<&str>) -> Self {
        self.root.disable_primary_path_template = template.and_then(|t| non_blank(t.to_string()));
        self
    }

    pub fn extra_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        let alias = alias.trim();
        if !alias.is_empty() {
            self.root.extra_aliases.push(alias.to_string());
        }
        self
    }

    /// Returns the child stored under `literal`, creating an empty router node
    /// for it first. Only meant for building trees.
    pub fn child_or_create(&mut self, literal: &str) -> &mut CommandNode {
        self.children
            .entry(literal.to_lowercase())
            .or_insert_with(|| CommandNode::literal(literal))
    }

    /// Exact literal match wins, otherwise the first child declaring `token` as an alias.
    pub fn find_child(&self, token: &str) -> Option<&CommandNode> {
        let key = token.to_lowercase();
        if let Some(child) = self.children.get(&key) {
            return Some(child);
        }
        self.children.values().find(|child| {
            child
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase() == key)
        })
    }

    /// Greedily follows literal tokens from this node. Stops at the first token
    /// that matches no child and returns the reached node with the number of
    /// tokens consumed.
    pub fn walk<'a>(&'a self, tokens: &[&str]) -> (&'a CommandNode, usize) {
        let mut node = self;
        let mut consumed = 0;
        for token in tokens {
            match node.find_child(token) {
                Some(next) => {
                    node = next;
                    consumed += 1;
                }
                None => break,
            }
        }
        (node, consumed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn children(&self) -> impl Iterator<Item = &CommandNode> {
        self.children.values()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn get_permission_default(&self) -> PermissionDefault {
        self.permission_default
    }

    pub fn get_visibility(&self) -> VisibilityPolicy {
        self.visibility
    }

    pub fn is_player_only(&self) -> bool {
        self.player_only
    }

    pub fn hides_from_console(&self) -> bool {
        self.hide_from_console
    }

    pub fn enabled_toggle(&self) -> &EnabledToggle {
        &self.enabled
    }

    pub fn root_settings(&self) -> &RootSettings {
        &self.root
    }

    pub fn param_specs(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn has_executor(&self) -> bool {
        self.executor.is_some()
    }

    pub fn has_suggester(&self) -> bool {
        self.suggester.is_some()
    }

    pub(super) fn set_executor(&mut self, executor: Executor, params: Vec<ParamSpec>) {
        self.executor = Some(executor);
        self.params = params;
    }

    pub(super) fn set_suggester(&mut self, suggester: Suggester) {
        self.suggester = Some(suggester);
    }

    pub(super) fn root_settings_mut(&mut self) -> &mut RootSettings {
        &mut self.root
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("permission", &self.permission)
            .field("visibility", &self.visibility)
            .field("executable", &self.executor.is_some())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> CommandNode {
        CommandNode::literal("shop")
            .then(CommandNode::literal("Buy").alias("purchase"))
            .then(CommandNode::literal("sell").alias("buy-back"))
            .then(CommandNode::literal("balance").alias("bal"))
    }

    #[test]
    fn find_child_is_case_insensitive() {
        let root = tree();
        assert_eq!(root.find_child("BUY").map(|n| n.name()), Some("Buy"));
        assert_eq!(root.find_child("Bal").map(|n| n.name()), Some("balance"));
        assert!(root.find_child("nope").is_none());
    }

    #[test]
    fn literal_wins_over_alias() {
        let root = CommandNode::literal("root")
            .then(CommandNode::literal("a").alias("b"))
            .then(CommandNode::literal("b"));
        assert_eq!(root.find_child("b").map(|n| n.name()), Some("b"));
    }

    #[test]
    fn walk_stops_at_first_unknown_token() {
        let root = CommandNode::literal("a")
            .then(CommandNode::literal("b").then(CommandNode::literal("c")));
        let (node, consumed) = root.walk(&["b", "x", "c"]);
        assert_eq!(node.name(), "b");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn child_or_create_reuses_existing_children() {
        let mut root = CommandNode::literal("root");
        root.child_or_create("Sub").description = Some("first".to_string());
        let again = root.child_or_create("sub");
        assert_eq!(again.name(), "Sub");
        assert_eq!(again.get_description(), Some("first"));
        assert_eq!(root.children().count(), 1);
    }

    #[test]
    fn blank_aliases_are_ignored() {
        let node = CommandNode::literal("x").alias("  ").alias(" y ");
        assert_eq!(node.aliases(), ["y".to_string()]);
    }
}
