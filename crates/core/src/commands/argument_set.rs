use crate::commands::{
    error::{CommandResult, InternalError},
    value::Value,
};

/// Resolved arguments in declaration order, addressable by parameter name.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSet {
    args: Vec<(String, Value)>,
}

impl ArgumentSet {
    pub(super) fn empty() -> Self {
        Self { args: Vec::new() }
    }

    pub(super) fn new(args: Vec<(String, Value)>) -> Self {
        Self { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.args.iter().map(|(_, value)| value)
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.args.get(index).map(|(_, value)| value)
    }

    fn get(&self, name: &str) -> CommandResult<&Value> {
        self.args
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value)
            .ok_or_else(|| {
                InternalError::MissingArgument {
                    name: name.to_string(),
                }
                .into()
            })
    }

    pub fn get_string(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_string(name)?.clone())
    }

    pub fn get_integer(&self, name: &str) -> CommandResult<i32> {
        self.get(name)?.as_integer(name)
    }

    pub fn get_float(&self, name: &str) -> CommandResult<f64> {
        self.get(name)?.as_float(name)
    }

    pub fn get_boolean(&self, name: &str) -> CommandResult<bool> {
        self.get(name)?.as_boolean(name)
    }

    /// `None` when the parameter is optional and was left out.
    pub fn get_player(&self, name: &str) -> CommandResult<Option<String>> {
        Ok(self.get(name)?.as_player(name)?.cloned())
    }

    pub fn get_world(&self, name: &str) -> CommandResult<Option<String>> {
        Ok(self.get(name)?.as_world(name)?.cloned())
    }
}
