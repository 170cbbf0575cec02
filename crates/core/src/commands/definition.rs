use super::{
    argument::Argument,
    argument_set::ArgumentSet,
    error::DefinitionError,
};
use serde::Serialize;

/// Everything the dispatcher needs to know about one chat command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDefinition {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) group: String,
    pub(super) aliases: Vec<String>,
    pub(super) permissions: Vec<String>,
    pub(super) arguments: Vec<Argument>,
    pub(super) argument_sets: Vec<ArgumentSet>,
}

impl CommandDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn argument_sets(&self) -> &[ArgumentSet] {
        &self.argument_sets
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// The single argument set accepting `arity` tokens, if any.
    pub fn argument_set_for_arity(&self, arity: usize) -> Option<&ArgumentSet> {
        self.argument_sets.iter().find(|set| set.arity() == arity)
    }

    /// Case-insensitive match against the name and every alias.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.is_alias(name)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

pub struct CommandBuilder {
    definition: CommandDefinition,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DefinitionError::InvalidName);
        }

        Ok(Self {
            definition: CommandDefinition {
                name,
                description: String::new(),
                group: String::new(),
                aliases: Vec::new(),
                permissions: Vec::new(),
                arguments: Vec::new(),
                argument_sets: Vec::new(),
            },
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.definition.description = description.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.definition.group = group.into();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_argument(mut self, argument: Argument) -> Result<Self, DefinitionError> {
        if self.definition.argument(&argument.name).is_some() {
            return Err(DefinitionError::DuplicateArgument {
                command: self.definition.name.clone(),
                argument: argument.name,
            });
        }

        self.definition.arguments.push(argument);
        Ok(self)
    }

    pub fn with_argument_set(mut self, argument_set: ArgumentSet) -> Result<Self, DefinitionError> {
        if self
            .definition
            .argument_set_for_arity(argument_set.arity())
            .is_some()
        {
            return Err(DefinitionError::DuplicateArgumentSetArity {
                command: self.definition.name.clone(),
                arity: argument_set.arity(),
            });
        }

        if let Some(unknown) = argument_set
            .argument_names
            .iter()
            .find(|name| self.definition.argument(name).is_none())
        {
            return Err(DefinitionError::UnknownArgument {
                command: self.definition.name.clone(),
                argument: unknown.clone(),
            });
        }

        self.definition.argument_sets.push(argument_set);
        Ok(self)
    }

    pub fn with_empty_argument_set(self, name: Option<&str>) -> Result<Self, DefinitionError> {
        let set = ArgumentSet::new(Some(name.unwrap_or("empty")), Vec::<String>::new());
        self.with_argument_set(set)
    }

    /// Adds a set listing every argument declared so far, in declaration order.
    pub fn with_complete_argument_set(self, name: Option<&str>) -> Result<Self, DefinitionError> {
        let names = self
            .definition
            .arguments
            .iter()
            .map(|a| a.name.clone())
            .collect::<Vec<_>>();
        let set = ArgumentSet::new(Some(name.unwrap_or("complete")), names);
        self.with_argument_set(set)
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        let permission = permission.into();
        if !permission.is_empty() && !self.definition.permissions.contains(&permission) {
            self.definition.permissions.push(permission);
        }
        self
    }

    pub fn with_permissions<I, S>(self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        permissions
            .into_iter()
            .fold(self, |builder, permission| builder.with_permission(permission))
    }

    pub fn build(self) -> CommandDefinition {
        let mut definition = self.definition;
        // Commands with arguments always carry at least one set.
        if !definition.arguments.is_empty() && definition.argument_sets.is_empty() {
            let names = definition.arguments.iter().map(|a| a.name.clone());
            definition
                .argument_sets
                .push(ArgumentSet::new(Some("complete"), names));
        }
        definition
    }
}
