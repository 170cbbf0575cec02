use super::{
    argument_set::ParsedArguments, definition::CommandDefinition, registry::CommandRegistry,
    value::Value, CommandSender,
};
use crate::chat::Recipient;
use crate::commands::error::{CommandResult, InternalError, RuntimeError};
use crate::player::Player;
use crate::session::GameState;

pub struct ExecutionContext<'a> {
    pub game: &'a mut GameState,
    registry: &'a CommandRegistry,
    prefix: &'a str,
    sender: CommandSender,
    definition: &'a CommandDefinition,
    arguments: Option<ParsedArguments>,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(
        game: &'a mut GameState,
        registry: &'a CommandRegistry,
        prefix: &'a str,
        sender: CommandSender,
        definition: &'a CommandDefinition,
        arguments: Option<ParsedArguments>,
    ) -> Self {
        Self {
            game,
            registry,
            prefix,
            sender,
            definition,
            arguments,
        }
    }

    /// Present only when the command was invoked with at least one argument.
    pub fn args(&self) -> Option<&ParsedArguments> {
        self.arguments.as_ref()
    }

    pub fn definition(&self) -> &'a CommandDefinition {
        self.definition
    }

    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    pub fn sender(&self) -> CommandSender {
        self.sender
    }

    /// The parsed value of `name`, falling back to its declared default.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .as_ref()
            .and_then(|args| args.get(name))
            .or_else(|| {
                self.definition
                    .argument(name)
                    .and_then(|argument| argument.get_default())
            })
    }

    pub fn get_string(&self, name: &str) -> CommandResult<String> {
        self.require(name)?.as_string(name).cloned()
    }

    pub fn get_number(&self, name: &str) -> CommandResult<f64> {
        self.require(name)?.as_number(name)
    }

    pub fn get_boolean(&self, name: &str) -> CommandResult<bool> {
        self.require(name)?.as_boolean(name)
    }

    fn require(&self, name: &str) -> CommandResult<&Value> {
        self.argument(name).ok_or_else(|| {
            RuntimeError::MissingArgument {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn reply(&mut self, message: &str) -> CommandResult<()> {
        let recipient = self.recipient()?;
        self.game.send(recipient, message);
        Ok(())
    }

    /// Where replies to this invocation go.
    pub fn recipient(&self) -> CommandResult<Recipient> {
        match self.sender {
            CommandSender::Player(_) => Ok(Recipient::Player(self.player()?.name.clone())),
            CommandSender::Console => Ok(Recipient::Console),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.game.sender_has_permission(self.sender, permission)
    }

    pub fn player(&self) -> CommandResult<&Player> {
        let index = self.player_index()?;
        self.game
            .players
            .get(index)
            .ok_or_else(|| InternalError::InvalidPlayerIndex { index }.into())
    }

    pub fn player_index(&self) -> CommandResult<usize> {
        match self.sender {
            CommandSender::Player(index) => Ok(index),
            CommandSender::Console => Err(RuntimeError::PlayerOnly.into()),
        }
    }
}
