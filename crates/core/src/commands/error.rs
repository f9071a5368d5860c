use crate::commands::{ModuleId, argument::ArgumentType};
use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while executing this command.";
pub const DEFAULT_DISABLED_MESSAGE: &str = "This command is currently disabled.";

/// Outcomes the sender is told about. Never fatal for the host.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("No permission.")]
    PermissionDenied { permission: String },
    #[error("Only players can use this command.")]
    PlayerOnly,
    #[error("{message}")]
    Disabled { message: String },
    #[error("Invalid {name}: {reason}")]
    InvalidArgument { name: String, reason: String },
    #[error("Missing argument: {name}")]
    MissingArgument { name: String },
    #[error("No resolver for: {arg_type}")]
    NoResolver { arg_type: ArgumentType },
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Error)]
pub enum InternalError {
    #[error("Internal error: Argument '{name}' not found in ArgumentSet (command registration bug)")]
    MissingArgument { name: String },
    #[error("Internal error: Argument '{name}' has wrong type, expected {expected} (command registration bug)")]
    WrongArgumentType { name: String, expected: String },
    #[error("Internal error (bug): {message}")]
    Message { message: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CommandError {
    pub fn runtime(message: impl Into<String>) -> Self {
        CommandError::Runtime(RuntimeError::Message(message.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal(InternalError::Message {
            message: message.into(),
        })
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// A resolver rejected a token. The message is shown to the sender.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ArgumentParseError(pub String);

impl ArgumentParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        ArgumentParseError(reason.into())
    }
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Root command '{root}' already registered by: {owner}")]
    Conflict { root: String, owner: ModuleId },
}
