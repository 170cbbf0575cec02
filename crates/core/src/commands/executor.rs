use crate::{
    chat::{ChatEvent, ChatEvents, ListenerToken},
    commands::{
        argument_set::ParsedArguments,
        context::ExecutionContext,
        definition::CommandDefinition,
        error::{CommandError, DispatchError},
        parser,
        registry::{CommandRegistration, CommandRegistry, Executor},
        usage,
    },
    session::GameState,
};
use tracing::{debug, error};

/// Owns the command table and turns prefixed chat lines into executor calls.
pub struct CommandDispatcher {
    prefix: String,
    registry: CommandRegistry,
    subscription: Option<ListenerToken>,
}

impl CommandDispatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            registry: CommandRegistry::new(),
            subscription: None,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Registers a command. The first registration also subscribes the
    /// dispatcher to `events`; later ones reuse that subscription.
    pub fn register(
        &mut self,
        events: &mut ChatEvents,
        definition: CommandDefinition,
        executor: Executor,
    ) {
        if self.subscription.is_none() {
            let token = events.subscribe(self.prefix.clone());
            debug!("Listening for chat commands with prefix '{}'", self.prefix);
            self.subscription = Some(token);
        }
        self.registry.register(definition, executor);
    }

    /// Drops the chat subscription. Safe to call any number of times.
    pub fn dispose(&mut self, events: &mut ChatEvents) -> bool {
        match self.subscription.take() {
            Some(token) => events.unsubscribe(token),
            None => false,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn owns(&self, token: ListenerToken) -> bool {
        self.subscription == Some(token)
    }

    /// Resolves a prefix-stripped line to a command and its arguments without running it.
    pub fn resolve_line(
        &self,
        line: &str,
        has_permission: impl Fn(&str) -> bool,
    ) -> Result<(&CommandRegistration, Option<ParsedArguments>), DispatchError> {
        let tokens = parser::tokenize(line);
        let Some((name, arguments)) = tokens.split_first() else {
            return Err(DispatchError::CommandNotFound {
                name: String::new(),
            });
        };

        let registration =
            self.registry
                .resolve(name)
                .ok_or_else(|| DispatchError::CommandNotFound {
                    name: name.clone(),
                })?;
        let definition = registration.definition();

        if !definition
            .permissions()
            .iter()
            .all(|permission| has_permission(permission))
        {
            return Err(DispatchError::PermissionDenied {
                permissions: definition.permissions().to_vec(),
            });
        }

        if arguments.is_empty() {
            return Ok((registration, None));
        }

        let set = definition
            .argument_set_for_arity(arguments.len())
            .ok_or_else(|| DispatchError::NoMatchingSignature {
                tokens: arguments.to_vec(),
            })?;
        let parsed = ParsedArguments::coerce(set, definition.arguments(), arguments).map_err(
            |errors| DispatchError::ArgumentParseErrors {
                line: line.to_string(),
                errors,
            },
        )?;

        Ok((registration, Some(parsed)))
    }

    /// Handles a chat event addressed to this dispatcher. The event is always
    /// cancelled, whatever the outcome.
    pub fn dispatch(&self, game: &mut GameState, event: &mut ChatEvent) {
        event.cancel();
        let Some(line) = parser::strip_prefix(&event.message, &self.prefix) else {
            return;
        };

        let sender = event.sender;
        let recipient = game.recipient(sender);
        debug!("Command from {:?}: {}", sender, line);

        let resolved = self.resolve_line(line, |permission| {
            game.sender_has_permission(sender, permission)
        });
        let (registration, arguments) = match resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                game.send_error(recipient.clone(), err.to_string());
                if matches!(
                    err,
                    DispatchError::NoMatchingSignature { .. }
                        | DispatchError::ArgumentParseErrors { .. }
                ) {
                    self.send_usage(game, recipient, line);
                }
                return;
            }
        };

        let definition = registration.definition();
        let mut ctx = ExecutionContext::new(
            game,
            &self.registry,
            &self.prefix,
            sender,
            definition,
            arguments,
        );
        match (registration.executor)(&mut ctx) {
            Ok(()) => {}
            Err(CommandError::Runtime(err)) => {
                game.send_error(recipient, err.to_string());
            }
            Err(CommandError::Internal(err)) => {
                error!("Command {} failed: {}", definition.name(), err);
                game.send_error(
                    recipient,
                    "An internal error occurred while running this command.",
                );
            }
        }
    }

    fn send_usage(&self, game: &mut GameState, recipient: crate::chat::Recipient, line: &str) {
        let tokens = parser::tokenize(line);
        let Some(registration) = tokens.first().and_then(|name| self.registry.resolve(name))
        else {
            return;
        };
        for usage in usage::generate_usage(&self.prefix, registration.definition()) {
            game.send(recipient.clone(), format!("Usage: {}", usage));
        }
    }
}
