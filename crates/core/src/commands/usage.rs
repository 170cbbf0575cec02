use super::{argument::Argument, argument_set::ArgumentSet, definition::CommandDefinition};
use itertools::Itertools;

/// One usage line per argument set, e.g. `.BuildBorder <sideLength:number>`.
pub fn generate_usage(prefix: &str, definition: &CommandDefinition) -> Vec<String> {
    if definition.argument_sets().is_empty() {
        return vec![format!("{}{}", prefix, definition.name())];
    }

    definition
        .argument_sets()
        .iter()
        .sorted_by_key(|set| set.arity())
        .map(|set| generate_set_usage(prefix, definition, set))
        .collect()
}

fn generate_set_usage(prefix: &str, definition: &CommandDefinition, set: &ArgumentSet) -> String {
    let mut parts = vec![format!("{}{}", prefix, definition.name())];
    parts.extend(set.argument_names().iter().map(|name| {
        match definition.argument(name) {
            Some(argument) => format!("<{}:{}>", argument.name(), argument.arg_type()),
            None => format!("<{}>", name),
        }
    }));
    parts.join(" ")
}

/// The single line `Help` prints for every command.
pub fn generate_summary(prefix: &str, definition: &CommandDefinition) -> String {
    let aliases = if definition.aliases().is_empty() {
        String::new()
    } else {
        format!("[{}] ", definition.aliases().join(", "))
    };
    format!(
        "{}{} - {}{}",
        prefix,
        definition.name(),
        aliases,
        definition.description()
    )
}

pub fn generate_details(prefix: &str, definition: &CommandDefinition) -> Vec<String> {
    let mut lines = vec![generate_summary(prefix, definition)];

    if !definition.group().is_empty() {
        lines.push(format!("Group: {}", definition.group()));
    }
    if !definition.permissions().is_empty() {
        lines.push(format!(
            "Permissions: {}",
            definition.permissions().iter().join(", ")
        ));
    }

    if !definition.arguments().is_empty() {
        lines.push("Arguments:".to_string());
        lines.extend(definition.arguments().iter().map(describe_argument));
    }

    lines.push("Usage:".to_string());
    for set in definition.argument_sets().iter().sorted_by_key(|set| set.arity()) {
        let usage = generate_set_usage(prefix, definition, set);
        match set.name() {
            Some(name) => lines.push(format!("  {} ({})", usage, name)),
            None => lines.push(format!("  {}", usage)),
        }
    }
    if definition.argument_sets().is_empty() {
        lines.push(format!("  {}{}", prefix, definition.name()));
    }

    lines
}

fn describe_argument(argument: &Argument) -> String {
    let mut line = format!("  {} : {}", argument.name(), argument.arg_type());
    if let Some(description) = argument.get_description() {
        line.push_str(" - ");
        line.push_str(description);
    }
    if let Some(default) = argument.get_default() {
        line.push_str(&format!(" (default: {})", default));
    }
    line
}
