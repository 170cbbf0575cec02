use super::argument::ArgumentType;
use crate::area::AreaError;
use itertools::Itertools;
use thiserror::Error;

/// Raised while a command definition is being built. These are setup bugs and
/// are expected to surface at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Commands must have a unique, non-empty name")]
    InvalidName,
    #[error("An argument for '{argument}' has already been configured on command '{command}'.")]
    DuplicateArgument { command: String, argument: String },
    #[error("An ArgumentSet with length {arity} already exists on command '{command}'.")]
    DuplicateArgumentSetArity { command: String, arity: usize },
    #[error("ArgumentSet on command '{command}' references undeclared argument '{argument}'.")]
    UnknownArgument { command: String, argument: String },
}

/// A single token that could not be converted to its declared type.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("[{index}] '{argument}' expects a {expected}. '{value}' is not a valid value.")]
pub struct CoercionError {
    pub index: usize,
    pub argument: String,
    pub expected: ArgumentType,
    pub value: String,
}

/// Reasons a chat line addressed to the dispatcher did not reach an executor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Unable to find the registered command: {name}.")]
    CommandNotFound { name: String },
    #[error(
        "The caller doesn't have the required permissions for this command. Permissions: {}.",
        .permissions.join(",")
    )]
    PermissionDenied { permissions: Vec<String> },
    #[error(
        "The arguments do not match any signature for this command. Arguments: {}",
        .tokens.join(" | ")
    )]
    NoMatchingSignature { tokens: Vec<String> },
    #[error(
        "There were errors parsing the command: {line}\n  {}",
        .errors.iter().join("\n  ")
    )]
    ArgumentParseErrors {
        line: String,
        errors: Vec<CoercionError>,
    },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("This command can only be executed by players")]
    PlayerOnly,
    #[error("Missing argument '{name}'")]
    MissingArgument { name: String },
    #[error("Command not found: {name}")]
    UnknownCommand { name: String },
    #[error(transparent)]
    Area(#[from] AreaError),
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Error)]
pub enum InternalError {
    #[error("Internal error: Argument '{name}' has wrong type, expected {expected} (command registration bug)")]
    WrongArgumentType { name: String, expected: ArgumentType },
    #[error("Internal error: Player index {index} is invalid (state management bug)")]
    InvalidPlayerIndex { index: usize },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl From<AreaError> for CommandError {
    fn from(err: AreaError) -> Self {
        CommandError::Runtime(err.into())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
