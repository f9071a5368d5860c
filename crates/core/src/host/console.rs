use crate::commands::CommandSender;
use crate::permissions::PermissionSet;

/// The operator at the terminal. Never a player, holds every permission.
pub struct ConsoleSender {
    name: String,
    permissions: PermissionSet,
}

impl ConsoleSender {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: PermissionSet::all(),
        }
    }
}

impl CommandSender for ConsoleSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_player(&self) -> bool {
        false
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.get_node_val(permission).unwrap_or(false)
    }

    fn send_message(&self, message: &str) {
        println!("{}", message);
    }

    fn send_error(&self, message: &str) {
        eprintln!("{}", message);
    }
}
