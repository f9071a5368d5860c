use crate::commands::{
    argument::ArgumentType,
    argument_parser::{
        BooleanResolver, Directory, FloatResolver, IntegerResolver, PlayerResolver,
        StringResolver, WorldResolver,
    },
    context::CommandSender,
    error::ArgumentParseError,
    value::Value,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Parser and completer for one semantic argument type.
pub trait ArgumentResolver: Send + Sync {
    fn arg_type(&self) -> ArgumentType;

    fn parse(&self, sender: &dyn CommandSender, input: &str) -> Result<Value, ArgumentParseError>;

    /// Candidates for the token being typed, already filtered by `prefix`.
    fn suggest(&self, _sender: &dyn CommandSender, _prefix: &str) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Default, Clone)]
pub struct ResolverRegistry {
    resolvers: FxHashMap<ArgumentType, Arc<dyn ArgumentResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text, numbers and booleans, plus player and world lookups through `directory`.
    pub fn with_builtins(directory: Arc<dyn Directory>) -> Self {
        let mut registry = Self::new();
        registry.register(StringResolver);
        registry.register(IntegerResolver);
        registry.register(FloatResolver);
        registry.register(BooleanResolver);
        registry.register(PlayerResolver::new(directory.clone()));
        registry.register(WorldResolver::new(directory));
        registry
    }

    /// Replaces any resolver already registered for the same type.
    pub fn register(&mut self, resolver: impl ArgumentResolver + 'static) {
        self.resolvers.insert(resolver.arg_type(), Arc::new(resolver));
    }

    pub fn resolver_for(&self, arg_type: ArgumentType) -> Option<&dyn ArgumentResolver> {
        self.resolvers.get(&arg_type).map(|resolver| resolver.as_ref())
    }
}
