use crate::commands::{
    argument_set::ArgumentSet,
    error::{CommandResult, RuntimeError},
};

/// The principal invoking or completing a command.
pub trait CommandSender: Send + Sync {
    fn name(&self) -> &str;

    /// Interactive players as opposed to the console or automation.
    fn is_player(&self) -> bool;

    fn has_permission(&self, permission: &str) -> bool;

    fn send_message(&self, message: &str);

    fn send_error(&self, message: &str) {
        self.send_message(message);
    }
}

pub struct ExecutionContext<'a> {
    sender: &'a dyn CommandSender,
    label: &'a str,
    raw_args: &'a [&'a str],
    arguments: ArgumentSet,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(
        sender: &'a dyn CommandSender,
        label: &'a str,
        raw_args: &'a [&'a str],
        arguments: ArgumentSet,
    ) -> Self {
        Self {
            sender,
            label,
            raw_args,
            arguments,
        }
    }

    pub fn args(&self) -> &ArgumentSet {
        &self.arguments
    }

    pub fn sender(&self) -> &dyn CommandSender {
        self.sender
    }

    /// The label the command was invoked with.
    pub fn label(&self) -> &str {
        self.label
    }

    /// Tokens left over after the literal path was consumed.
    pub fn raw_args(&self) -> &[&str] {
        self.raw_args
    }

    pub fn reply(&self, message: &str) -> CommandResult<()> {
        self.sender.send_message(message);
        Ok(())
    }

    pub fn error(&self, message: &str) -> CommandResult<()> {
        self.sender.send_error(message);
        Ok(())
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.sender.has_permission(permission)
    }

    pub fn require_permission(&self, permission: &str) -> CommandResult<()> {
        if !self.has_permission(permission) {
            return Err(RuntimeError::PermissionDenied {
                permission: permission.to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn require_player(&self) -> CommandResult<&str> {
        if self.sender.is_player() {
            Ok(self.sender.name())
        } else {
            Err(RuntimeError::PlayerOnly.into())
        }
    }
}
