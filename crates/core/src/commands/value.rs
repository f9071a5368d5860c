use crate::commands::error::{CommandResult, InternalError};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i32),
    Float(f64),
    Boolean(bool),
    Player(String),
    World(String),
    /// An optional argument without a natural zero value was left out.
    Unset,
}

impl Value {
    fn type_error(name: &str, expected: &str) -> InternalError {
        InternalError::WrongArgumentType {
            name: name.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(super) fn as_string(&self, name: &str) -> CommandResult<&String> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(Self::type_error(name, "String").into()),
        }
    }

    pub(super) fn as_integer(&self, name: &str) -> CommandResult<i32> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(Self::type_error(name, "Integer").into()),
        }
    }

    pub(super) fn as_float(&self, name: &str) -> CommandResult<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(Self::type_error(name, "Float").into()),
        }
    }

    pub(super) fn as_boolean(&self, name: &str) -> CommandResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(Self::type_error(name, "Boolean").into()),
        }
    }

    pub(super) fn as_player(&self, name: &str) -> CommandResult<Option<&String>> {
        match self {
            Value::Player(p) => Ok(Some(p)),
            Value::Unset => Ok(None),
            _ => Err(Self::type_error(name, "Player").into()),
        }
    }

    pub(super) fn as_world(&self, name: &str) -> CommandResult<Option<&String>> {
        match self {
            Value::World(w) => Ok(Some(w)),
            Value::Unset => Ok(None),
            _ => Err(Self::type_error(name, "World").into()),
        }
    }
}
