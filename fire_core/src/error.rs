//! Error types for the fire dispatcher.

use thiserror::Error;

use crate::coerce::CoercionError;

/// Why a command line was rejected before anything was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// A method set was fired but no command name was given.
    MissingCommand,

    /// The command name matches no registered method.
    UnknownCommand(String),

    /// The number of raw arguments differs from what the command needs.
    ArityMismatch { expected: usize, got: usize },
}

/// Errors that can occur while firing a target.
#[derive(Debug, Error)]
pub enum FireError {
    /// Unresolved command or wrong number of arguments. Usage has already
    /// been printed when this is returned from a dispatch.
    #[error("Invalid command")]
    InvalidCommand { reason: InvalidReason },

    /// The target is neither a function nor a set of methods.
    #[error("unsupported target type {type_name}: expected a function or a method set")]
    UnsupportedTarget { type_name: &'static str },

    /// A token could not be converted to its declared parameter type.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// `invoke` was called on a symbol without bound arguments.
    #[error("command '{command}' invoked without bound arguments")]
    Unbound { command: String },

    /// `bind` received a different number of tokens than declared parameters.
    #[error("command '{command}' takes {expected} arguments, {got} were bound")]
    ArgumentCount { command: String, expected: usize, got: usize },

    /// A bound value does not match the declared type of its parameter.
    #[error("argument {index} of command '{command}' has the wrong type")]
    ArgumentMismatch { command: String, index: usize },

    /// Writing results or usage to the output sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl FireError {
    pub fn unknown_command(name: &str) -> Self {
        FireError::InvalidCommand {
            reason: InvalidReason::UnknownCommand(name.to_owned()),
        }
    }

    /// True for the "invalid command" outcome (bad selector or arity).
    pub fn is_invalid_command(&self) -> bool {
        matches!(self, FireError::InvalidCommand { .. })
    }
}
