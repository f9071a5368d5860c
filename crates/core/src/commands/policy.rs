use crate::commands::{
    ModuleId,
    context::CommandSender,
    error::{DEFAULT_DISABLED_MESSAGE, RuntimeError},
    node::{CommandNode, VisibilityPolicy},
};
use crate::consumer_config::ConsumerConfig;
use itertools::Itertools;

/// Enabled, player-only, permission and visibility rules for one sender
/// against one root. Dispatch and suggestion both go through here.
pub(super) struct Policy<'a> {
    config: &'a dyn ConsumerConfig,
    owner: &'a ModuleId,
    root: &'a CommandNode,
    sender: &'a dyn CommandSender,
}

impl<'a> Policy<'a> {
    pub(super) fn new(
        config: &'a dyn ConsumerConfig,
        owner: &'a ModuleId,
        root: &'a CommandNode,
        sender: &'a dyn CommandSender,
    ) -> Self {
        Self {
            config,
            owner,
            root,
            sender,
        }
    }

    /// The config override is read on every call.
    pub(super) fn is_enabled(&self, node: &CommandNode) -> bool {
        if let Some(template) = &node.enabled.config_path {
            let path = template.replace("{root}", self.root.name());
            if let Some(enabled) =
                self.config
                    .read_bool(self.owner, &self.root.root.config_source, &path)
            {
                return enabled;
            }
        }
        node.enabled.default
    }

    pub(super) fn can_use(&self, node: &CommandNode) -> bool {
        match node.permission.as_deref().map(str::trim) {
            Some(permission) if !permission.is_empty() => self.sender.has_permission(permission),
            _ => true,
        }
    }

    fn passes_player_only(&self, node: &CommandNode) -> bool {
        !node.player_only || self.sender.is_player()
    }

    fn hidden_from_sender(&self, node: &CommandNode) -> bool {
        !self.passes_player_only(node) && node.hide_from_console
    }

    /// Dispatch checks for an executable node, in order: enabled, player-only, permission.
    pub(super) fn check_executable(&self, node: &CommandNode) -> Result<(), RuntimeError> {
        if !self.is_enabled(node) {
            let message = node
                .enabled
                .disabled_message
                .clone()
                .unwrap_or_else(|| DEFAULT_DISABLED_MESSAGE.to_string());
            return Err(RuntimeError::Disabled { message });
        }
        if !self.passes_player_only(node) {
            return Err(RuntimeError::PlayerOnly);
        }
        if !self.can_use(node) {
            return Err(RuntimeError::PermissionDenied {
                permission: node.permission.clone().unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// The same checks as [`Self::check_executable`], but as visibility gates
    /// for argument completion.
    pub(super) fn allows_argument_suggestions(&self, node: &CommandNode) -> bool {
        if node.enabled.hide_when_disabled && !self.is_enabled(node) {
            return false;
        }
        if self.hidden_from_sender(node) {
            return false;
        }
        self.can_use(node)
    }

    pub(super) fn is_visible(&self, node: &CommandNode) -> bool {
        if node.enabled.hide_when_disabled && !self.is_enabled(node) {
            return false;
        }
        if self.hidden_from_sender(node) {
            return false;
        }
        match node.visibility {
            VisibilityPolicy::Always => true,
            VisibilityPolicy::Hidden => false,
            VisibilityPolicy::IfExecutable => {
                self.is_enabled(node) && self.passes_player_only(node) && self.can_use(node)
            }
        }
    }

    /// Names of the visible children of `node` starting with `prefix`, sorted
    /// case-insensitively.
    pub(super) fn visible_children(&self, node: &CommandNode, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        node.children
            .values()
            .filter(|child| child.name.to_lowercase().starts_with(&prefix))
            .filter(|child| self.is_visible(child))
            .map(|child| child.name.clone())
            .sorted_by_key(|name| name.to_lowercase())
            .collect()
    }
}
