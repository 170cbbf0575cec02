mod argument;
mod argument_set;
pub mod builtin;
mod context;
mod definition;
mod error;
mod executor;
pub mod parser;
mod registry;
pub mod usage;
mod value;

pub use argument::{Argument, ArgumentType};
pub use argument_set::{ArgumentSet, ParsedArguments};
pub use context::ExecutionContext;
pub use definition::{CommandBuilder, CommandDefinition};
pub use error::{
    CoercionError, CommandError, CommandResult, DefinitionError, DispatchError, InternalError,
    RuntimeError,
};
pub use executor::CommandDispatcher;
pub use registry::{CommandRegistration, CommandRegistry, Executor};
pub use value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    Player(usize),
    Console,
}
