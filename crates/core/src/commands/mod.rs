mod argument;
mod argument_parser;
mod argument_set;
mod autocomplete;
mod context;
mod descriptor;
mod error;
mod executor;
mod node;
mod policy;
mod registry;
mod resolver;
mod service;
mod value;

use std::fmt;
use std::sync::Arc;

pub use argument::{ArgumentType, ParamSpec};
pub use argument_parser::{
    BooleanResolver, Directory, FloatResolver, IntegerResolver, PlayerResolver, StaticDirectory,
    StringResolver, WorldResolver,
};
pub use argument_set::ArgumentSet;
pub use context::{CommandSender, ExecutionContext};
pub use descriptor::{CommandDescriptor, DescriptorSource, RootToggle};
pub use error::{
    ArgumentParseError, CommandError, CommandResult, DEFAULT_DISABLED_MESSAGE,
    GENERIC_FAILURE_MESSAGE, InternalError, RegistrationError, RuntimeError,
};
pub use executor::ExecutionEngine;
pub use node::{
    CommandNode, DEFAULT_ALIAS_PATH_TEMPLATE, DEFAULT_DISABLE_PRIMARY_PATH_TEMPLATE,
    EnabledToggle, Executor, RootSettings, Suggester, VisibilityPolicy,
};
pub use registry::CommandRegistry;
pub use resolver::{ArgumentResolver, ResolverRegistry};
pub use service::{BoundCommand, CommandRegistrar, CommandService, RootInfo, RootSupplier};
pub use value::Value;

/// Identity of a module that owns commands. Compared by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(Arc<str>);

impl ModuleId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
