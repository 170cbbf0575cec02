use super::{context::ExecutionContext, definition::CommandDefinition, error::CommandResult};
use indexmap::IndexMap;
use tracing::{debug, warn};

pub type Executor = fn(&mut ExecutionContext<'_>) -> CommandResult<()>;

pub struct CommandRegistration {
    pub(super) definition: CommandDefinition,
    pub(super) executor: Executor,
}

impl CommandRegistration {
    pub fn definition(&self) -> &CommandDefinition {
        &self.definition
    }
}

/// Commands keyed by their lower-cased name, in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    registrations: IndexMap<String, CommandRegistration>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `definition`, replacing any command registered under the same name.
    pub fn register(&mut self, definition: CommandDefinition, executor: Executor) {
        let key = definition.name.to_lowercase();

        for (other_key, other) in &self.registrations {
            if *other_key == key {
                continue;
            }
            for alias in &definition.aliases {
                if other.definition.answers_to(alias) {
                    warn!(
                        "Alias '{}' of command '{}' is already claimed by '{}'; '{}' keeps it",
                        alias, definition.name, other.definition.name, other.definition.name
                    );
                }
            }
            if other.definition.is_alias(&key) {
                warn!(
                    "Command '{}' shadows an alias of '{}'",
                    definition.name, other.definition.name
                );
            }
        }

        debug!("Registering command {}: {:?}", definition.name, definition);
        if let Some(previous) = self.registrations.insert(
            key,
            CommandRegistration {
                definition,
                executor,
            },
        ) {
            debug!("Replaced previous registration of {}", previous.definition.name);
        }
    }

    /// Looks `name` up by primary name first, then by alias. Both are case-insensitive.
    /// When two commands claim the same alias, the one registered first wins.
    pub fn resolve(&self, name: &str) -> Option<&CommandRegistration> {
        let key = name.to_lowercase();
        self.registrations.get(&key).or_else(|| {
            self.registrations
                .values()
                .find(|registration| registration.definition.is_alias(&key))
        })
    }

    /// Every definition in registration order, or only the one `name` resolves to.
    pub fn definitions(&self, name: Option<&str>) -> Vec<&CommandDefinition> {
        match name {
            Some(name) => self
                .resolve(name)
                .map(|registration| vec![&registration.definition])
                .unwrap_or_default(),
            None => self
                .registrations
                .values()
                .map(|registration| &registration.definition)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definition::CommandBuilder;

    fn noop(_: &mut ExecutionContext<'_>) -> CommandResult<()> {
        Ok(())
    }

    fn command(name: &str, aliases: &[&str]) -> CommandDefinition {
        CommandBuilder::new(name)
            .unwrap()
            .with_aliases(aliases.iter().copied())
            .build()
    }

    #[test]
    fn name_and_alias_resolve_case_insensitively() {
        let mut registry = CommandRegistry::new();
        registry.register(command("Foo", &["f"]), noop);

        assert_eq!(registry.resolve("foo").unwrap().definition().name(), "Foo");
        assert_eq!(registry.resolve("FOO").unwrap().definition().name(), "Foo");
        assert_eq!(registry.resolve("F").unwrap().definition().name(), "Foo");
        assert!(registry.resolve("bar").is_none());
    }

    #[test]
    fn reregistering_overwrites() {
        let mut registry = CommandRegistry::new();
        registry.register(command("Foo", &["f"]), noop);
        registry.register(command("FOO", &["g"]), noop);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("foo").unwrap().definition().name(), "FOO");
        assert!(registry.resolve("f").is_none());
    }

    #[test]
    fn primary_name_beats_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(command("Tag", &["stop"]), noop);
        registry.register(command("Stop", &[]), noop);

        assert_eq!(registry.resolve("stop").unwrap().definition().name(), "Stop");
    }

    #[test]
    fn first_registered_alias_wins() {
        let mut registry = CommandRegistry::new();
        registry.register(command("StartGame", &["s"]), noop);
        registry.register(command("StopGame", &["s"]), noop);

        assert_eq!(registry.resolve("s").unwrap().definition().name(), "StartGame");
    }

    #[test]
    fn definitions_keep_registration_order() {
        let mut registry = CommandRegistry::new();
        registry.register(command("Zeta", &[]), noop);
        registry.register(command("Alpha", &["a"]), noop);

        let definitions = registry.definitions(None);
        let names = definitions.iter().map(|d| d.name()).collect::<Vec<_>>();
        assert_eq!(names, ["Zeta", "Alpha"]);
        assert_eq!(registry.definitions(Some("a"))[0].name(), "Alpha");
        assert!(registry.definitions(Some("missing")).is_empty());
    }
}
