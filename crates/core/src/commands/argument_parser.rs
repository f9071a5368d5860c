use crate::commands::{
    argument::ArgumentType, context::CommandSender, error::ArgumentParseError,
    resolver::ArgumentResolver, value::Value,
};
use itertools::Itertools;
use std::sync::Arc;

pub type ArgumentParseResult = Result<Value, ArgumentParseError>;

/// Host lookups backing the player and world resolvers.
pub trait Directory: Send + Sync {
    fn online_players(&self) -> Vec<String>;

    fn worlds(&self) -> Vec<String>;
}

/// A fixed set of player and world names.
#[derive(Debug, Default, Clone)]
pub struct StaticDirectory {
    pub players: Vec<String>,
    pub worlds: Vec<String>,
}

impl Directory for StaticDirectory {
    fn online_players(&self) -> Vec<String> {
        self.players.clone()
    }

    fn worlds(&self) -> Vec<String> {
        self.worlds.clone()
    }
}

pub fn parse_string(input: &str) -> ArgumentParseResult {
    Ok(Value::String(input.to_string()))
}

pub fn parse_integer(input: &str) -> ArgumentParseResult {
    let value = input
        .parse::<i32>()
        .map_err(|_| ArgumentParseError::new("Not a number"))?;
    Ok(Value::Integer(value))
}

pub fn parse_float(input: &str) -> ArgumentParseResult {
    let value = input
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ArgumentParseError::new("Not a number"))?;
    Ok(Value::Float(value))
}

pub fn parse_boolean(input: &str) -> ArgumentParseResult {
    let value = match input.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => true,
        "false" | "no" | "n" | "0" | "off" => false,
        _ => return Err(ArgumentParseError::new("Not a boolean")),
    };
    Ok(Value::Boolean(value))
}

/// Keeps the candidates starting with `prefix`, ignoring case.
pub fn filter_prefix<I, S>(candidates: I, prefix: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let prefix = prefix.to_lowercase();
    candidates
        .into_iter()
        .map(Into::into)
        .filter(|candidate| candidate.to_lowercase().starts_with(&prefix))
        .collect()
}

pub struct StringResolver;

impl ArgumentResolver for StringResolver {
    fn arg_type(&self) -> ArgumentType {
        ArgumentType::String
    }

    fn parse(&self, _: &dyn CommandSender, input: &str) -> ArgumentParseResult {
        parse_string(input)
    }
}

pub struct IntegerResolver;

impl ArgumentResolver for IntegerResolver {
    fn arg_type(&self) -> ArgumentType {
        ArgumentType::Integer
    }

    fn parse(&self, _: &dyn CommandSender, input: &str) -> ArgumentParseResult {
        parse_integer(input)
    }
}

pub struct FloatResolver;

impl ArgumentResolver for FloatResolver {
    fn arg_type(&self) -> ArgumentType {
        ArgumentType::Float
    }

    fn parse(&self, _: &dyn CommandSender, input: &str) -> ArgumentParseResult {
        parse_float(input)
    }
}

pub struct BooleanResolver;

impl ArgumentResolver for BooleanResolver {
    fn arg_type(&self) -> ArgumentType {
        ArgumentType::Boolean
    }

    fn parse(&self, _: &dyn CommandSender, input: &str) -> ArgumentParseResult {
        parse_boolean(input)
    }

    fn suggest(&self, _: &dyn CommandSender, prefix: &str) -> Vec<String> {
        filter_prefix(["true", "false"], prefix)
    }
}

pub struct PlayerResolver {
    directory: Arc<dyn Directory>,
}

impl PlayerResolver {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

impl ArgumentResolver for PlayerResolver {
    fn arg_type(&self) -> ArgumentType {
        ArgumentType::Player
    }

    fn parse(&self, _: &dyn CommandSender, input: &str) -> ArgumentParseResult {
        self.directory
            .online_players()
            .into_iter()
            .find(|name| name.eq_ignore_ascii_case(input))
            .map(Value::Player)
            .ok_or_else(|| ArgumentParseError::new("Player not found"))
    }

    fn suggest(&self, _: &dyn CommandSender, prefix: &str) -> Vec<String> {
        filter_prefix(self.directory.online_players(), prefix)
    }
}

pub struct WorldResolver {
    directory: Arc<dyn Directory>,
}

impl WorldResolver {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

impl ArgumentResolver for WorldResolver {
    fn arg_type(&self) -> ArgumentType {
        ArgumentType::World
    }

    fn parse(&self, _: &dyn CommandSender, input: &str) -> ArgumentParseResult {
        self.directory
            .worlds()
            .into_iter()
            .find(|name| name == input)
            .map(Value::World)
            .ok_or_else(|| ArgumentParseError::new("World not found"))
    }

    fn suggest(&self, _: &dyn CommandSender, prefix: &str) -> Vec<String> {
        filter_prefix(self.directory.worlds().into_iter().sorted(), prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nobody;

    impl CommandSender for Nobody {
        fn name(&self) -> &str {
            "nobody"
        }

        fn is_player(&self) -> bool {
            false
        }

        fn has_permission(&self, _: &str) -> bool {
            false
        }

        fn send_message(&self, _: &str) {}
    }

    #[test]
    fn boolean_spellings() {
        for token in ["true", "YES", "y", "1", "On"] {
            assert_eq!(parse_boolean(token).unwrap(), Value::Boolean(true), "{token}");
        }
        for token in ["false", "No", "n", "0", "OFF"] {
            assert_eq!(parse_boolean(token).unwrap(), Value::Boolean(false), "{token}");
        }
        assert_eq!(parse_boolean("maybe").unwrap_err().to_string(), "Not a boolean");
    }

    #[test]
    fn numbers_reject_garbage() {
        assert_eq!(parse_integer("-12").unwrap(), Value::Integer(-12));
        assert_eq!(parse_integer("1.5").unwrap_err().to_string(), "Not a number");
        assert_eq!(parse_float("1.5").unwrap(), Value::Float(1.5));
        assert!(parse_float("NaN").is_err());
        assert!(parse_float("abc").is_err());
    }

    #[test]
    fn boolean_suggestions_follow_prefix() {
        assert_eq!(BooleanResolver.suggest(&Nobody, ""), ["true", "false"]);
        assert_eq!(BooleanResolver.suggest(&Nobody, "F"), ["false"]);
    }

    #[test]
    fn player_lookup_uses_directory() {
        let directory = Arc::new(StaticDirectory {
            players: vec!["Steve".to_string(), "Alex".to_string(), "stan".to_string()],
            worlds: Vec::new(),
        });
        let resolver = PlayerResolver::new(directory);
        assert_eq!(
            resolver.parse(&Nobody, "steve").unwrap(),
            Value::Player("Steve".to_string())
        );
        assert_eq!(
            resolver.parse(&Nobody, "herobrine").unwrap_err().to_string(),
            "Player not found"
        );
        assert_eq!(resolver.suggest(&Nobody, "st"), ["Steve", "stan"]);
    }
}
