use super::{
    argument::Argument,
    error::{CoercionError, CommandResult},
    value::Value,
};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// One accepted ordering of positional arguments. Argument sets on the same
/// command are told apart by their arity alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentSet {
    pub(super) name: Option<String>,
    pub(super) argument_names: Vec<String>,
}

impl ArgumentSet {
    pub fn new<I, S>(name: Option<&str>, argument_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.map(str::to_string),
            argument_names: argument_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named<I, S>(name: &str, argument_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Some(name), argument_names)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn argument_names(&self) -> &[String] {
        &self.argument_names
    }

    pub fn arity(&self) -> usize {
        self.argument_names.len()
    }
}

/// Values produced by coercing chat tokens against a matched argument set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedArguments {
    matched_set: ArgumentSet,
    values: FxHashMap<String, Value>,
}

impl ParsedArguments {
    /// Coerces `tokens` positionally against `set`. Every failing token is
    /// reported, not only the first one.
    pub(super) fn coerce(
        set: &ArgumentSet,
        arguments: &[Argument],
        tokens: &[String],
    ) -> Result<Self, Vec<CoercionError>> {
        debug_assert_eq!(set.arity(), tokens.len());

        let mut values = FxHashMap::default();
        let mut errors = Vec::new();
        for (index, (name, token)) in set.argument_names.iter().zip(tokens).enumerate() {
            let Some(argument) = arguments.iter().find(|a| &a.name == name) else {
                unreachable!("argument sets only reference declared arguments")
            };
            match argument.arg_type.coerce(token) {
                Ok(value) => {
                    values.insert(name.clone(), value);
                }
                Err(()) => errors.push(CoercionError {
                    index,
                    argument: name.clone(),
                    expected: argument.arg_type,
                    value: token.clone(),
                }),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        for argument in arguments {
            if let Some(default) = &argument.default_value {
                values
                    .entry(argument.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }

        Ok(Self {
            matched_set: set.clone(),
            values,
        })
    }

    pub fn matched_set(&self) -> &ArgumentSet {
        &self.matched_set
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_string(&self, name: &str) -> Option<CommandResult<String>> {
        self.get(name).map(|value| value.as_string(name).cloned())
    }

    pub fn get_number(&self, name: &str) -> Option<CommandResult<f64>> {
        self.get(name).map(|value| value.as_number(name))
    }

    pub fn get_boolean(&self, name: &str) -> Option<CommandResult<bool>> {
        self.get(name).map(|value| value.as_boolean(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::argument::ArgumentType;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn coercion_errors_are_accumulated() {
        let arguments = vec![
            Argument::number("x"),
            Argument::boolean("flag"),
            Argument::number("z"),
        ];
        let set = ArgumentSet::named("all", ["x", "flag", "z"]);

        let errors = ParsedArguments::coerce(&set, &arguments, &tokens(&["1", "maybe", "q"]))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].index, 1);
        assert_eq!(errors[0].expected, ArgumentType::Boolean);
        assert_eq!(
            errors[1].to_string(),
            "[2] 'z' expects a number. 'q' is not a valid value."
        );
    }

    #[test]
    fn defaults_fill_arguments_outside_the_matched_set() {
        let arguments = vec![
            Argument::string("name"),
            Argument::number("age").default_value(10),
            Argument::boolean("verbose"),
        ];
        let set = ArgumentSet::named("short", ["name"]);

        let parsed = ParsedArguments::coerce(&set, &arguments, &tokens(&["steve"])).unwrap();
        assert_eq!(parsed.get_string("name").unwrap().unwrap(), "steve");
        assert_eq!(parsed.get_number("age").unwrap().unwrap(), 10.0);
        assert!(parsed.get_boolean("verbose").is_none());
        assert_eq!(parsed.matched_set().name(), Some("short"));
    }
}
