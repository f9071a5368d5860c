use crate::commands::value::Value;
use std::fmt;

/// Semantic type tag of a positional argument. Resolvers are looked up by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    String,
    Integer,
    Float,
    Boolean,
    /// Name of an online player.
    Player,
    /// Name of a loaded world.
    World,
}

impl ArgumentType {
    /// The value bound to an optional parameter the sender left out.
    pub fn zero_value(&self) -> Value {
        match self {
            ArgumentType::String => Value::String(String::new()),
            ArgumentType::Integer => Value::Integer(0),
            ArgumentType::Float => Value::Float(0.0),
            ArgumentType::Boolean => Value::Boolean(false),
            ArgumentType::Player | ArgumentType::World => Value::Unset,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArgumentType::String => "string",
            ArgumentType::Integer => "integer",
            ArgumentType::Float => "float",
            ArgumentType::Boolean => "boolean",
            ArgumentType::Player => "player",
            ArgumentType::World => "world",
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub(super) arg_type: ArgumentType,
    pub(super) name: String,
    pub(super) optional: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, arg_type: ArgumentType) -> Self {
        Self {
            arg_type,
            name: name.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, arg_type: ArgumentType) -> Self {
        Self {
            arg_type,
            name: name.into(),
            optional: true,
        }
    }

    pub fn arg_type(&self) -> ArgumentType {
        self.arg_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}
