use super::value::Value;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    String,
    Number,
    Boolean,
}

impl ArgumentType {
    /// Converts a raw chat token into a value of this type.
    pub fn coerce(self, token: &str) -> Result<Value, ()> {
        match self {
            ArgumentType::String => Ok(Value::String(token.to_string())),
            ArgumentType::Number => {
                let token = token.trim();
                let value = token.parse::<f64>().map_err(|_| ())?;
                if value.is_nan() {
                    return Err(());
                }
                // Only the spelled-out `Infinity` is accepted; `inf` and
                // lowercase forms are not numbers in chat.
                let unsigned = token.trim_start_matches(['+', '-']);
                if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) && unsigned != "Infinity" {
                    return Err(());
                }
                Ok(Value::Number(value))
            }
            ArgumentType::Boolean => match token.to_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(()),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArgumentType::String => "string",
            ArgumentType::Number => "number",
            ArgumentType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, typed positional argument declared on a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    pub(super) name: String,
    pub(super) arg_type: ArgumentType,
    pub(super) description: Option<String>,
    pub(super) default_value: Option<Value>,
}

impl Argument {
    pub fn new(name: impl Into<String>, arg_type: ArgumentType) -> Self {
        Self {
            name: name.into(),
            arg_type,
            description: None,
            default_value: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ArgumentType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ArgumentType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ArgumentType::Boolean)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Value used when a matched argument set does not include this argument.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg_type(&self) -> ArgumentType {
        self.arg_type
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get_default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }
}
