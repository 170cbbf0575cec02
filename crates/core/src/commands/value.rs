use super::argument::ArgumentType;
use crate::commands::error::{CommandResult, InternalError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub(super) fn as_string(&self, name: &str) -> CommandResult<&String> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(wrong_type(name, ArgumentType::String)),
        }
    }

    pub(super) fn as_number(&self, name: &str) -> CommandResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            _ => Err(wrong_type(name, ArgumentType::Number)),
        }
    }

    pub(super) fn as_boolean(&self, name: &str) -> CommandResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(wrong_type(name, ArgumentType::Boolean)),
        }
    }
}

fn wrong_type(name: &str, expected: ArgumentType) -> super::error::CommandError {
    InternalError::WrongArgumentType {
        name: name.to_string(),
        expected,
    }
    .into()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
