use crate::commands::{
    ModuleId,
    argument::ParamSpec,
    argument_set::ArgumentSet,
    context::{CommandSender, ExecutionContext},
    error::{CommandError, GENERIC_FAILURE_MESSAGE, RuntimeError},
    node::CommandNode,
    policy::Policy,
    resolver::ResolverRegistry,
    value::Value,
};
use crate::consumer_config::ConsumerConfig;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

/// Stateless dispatch and completion over whatever tree it is handed.
pub struct ExecutionEngine {
    resolvers: Arc<ResolverRegistry>,
    config: Arc<dyn ConsumerConfig>,
}

impl ExecutionEngine {
    pub fn new(resolvers: Arc<ResolverRegistry>, config: Arc<dyn ConsumerConfig>) -> Self {
        Self { resolvers, config }
    }

    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    pub(super) fn policy<'a>(
        &'a self,
        owner: &'a ModuleId,
        root: &'a CommandNode,
        sender: &'a dyn CommandSender,
    ) -> Policy<'a> {
        Policy::new(self.config.as_ref(), owner, root, sender)
    }

    /// Children of `node` the sender may see, sorted case-insensitively.
    pub fn visible_subcommands<'n>(
        &self,
        owner: &ModuleId,
        sender: &dyn CommandSender,
        root: &CommandNode,
        node: &'n CommandNode,
    ) -> Vec<&'n CommandNode> {
        self.policy(owner, root, sender)
            .visible_children(node, "")
            .iter()
            .filter_map(|name| node.find_child(name))
            .collect()
    }

    /// Runs the command `args` selects below `root`. Every outcome is reported
    /// to `sender`; nothing is returned to the caller.
    pub fn execute(
        &self,
        owner: &ModuleId,
        sender: &dyn CommandSender,
        label: &str,
        root: &CommandNode,
        args: &[&str],
    ) {
        let (node, consumed) = root.walk(args);
        let policy = self.policy(owner, root, sender);

        let Some(executor) = &node.executor else {
            sender.send_error(&format!("Usage: /{} <subcommand>", label));
            let visible = policy.visible_children(node, "");
            if !visible.is_empty() {
                sender.send_message(&format!("Available: {}", visible.join(", ")));
            }
            return;
        };

        if let Err(err) = policy.check_executable(node) {
            sender.send_error(&err.to_string());
            return;
        }

        let remaining = &args[consumed..];
        let arguments = match self.bind_arguments(sender, &node.params, remaining) {
            Ok(arguments) => arguments,
            Err(err) => {
                sender.send_error(&err.to_string());
                return;
            }
        };

        let mut ctx = ExecutionContext::new(sender, label, remaining, arguments);
        let result = panic::catch_unwind(AssertUnwindSafe(|| executor(&mut ctx)));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(CommandError::Runtime(err))) => sender.send_error(&err.to_string()),
            Ok(Err(CommandError::Internal(err))) => {
                error!(
                    "Command '/{}' of {} ({} {}) failed: {}",
                    label,
                    owner,
                    root.name(),
                    args[..consumed].join(" "),
                    err
                );
                sender.send_error(GENERIC_FAILURE_MESSAGE);
            }
            Err(payload) => {
                error!(
                    "Command '/{}' of {} ({} {}) panicked: {}",
                    label,
                    owner,
                    root.name(),
                    args[..consumed].join(" "),
                    panic_message(payload.as_ref())
                );
                sender.send_error(GENERIC_FAILURE_MESSAGE);
            }
        }
    }

    /// Resolves `remaining` positionally against `params`. Stops at the first
    /// parameter that cannot be bound.
    fn bind_arguments(
        &self,
        sender: &dyn CommandSender,
        params: &[ParamSpec],
        remaining: &[&str],
    ) -> Result<ArgumentSet, RuntimeError> {
        if params.is_empty() {
            return Ok(ArgumentSet::empty());
        }

        let mut values: Vec<(String, Value)> = Vec::with_capacity(params.len());
        for (index, spec) in params.iter().enumerate() {
            let value = match remaining.get(index) {
                None if spec.optional => spec.arg_type.zero_value(),
                None => {
                    return Err(RuntimeError::MissingArgument {
                        name: spec.name.clone(),
                    });
                }
                Some(token) => {
                    let resolver = self.resolvers.resolver_for(spec.arg_type).ok_or(
                        RuntimeError::NoResolver {
                            arg_type: spec.arg_type,
                        },
                    )?;
                    resolver
                        .parse(sender, token)
                        .map_err(|err| RuntimeError::InvalidArgument {
                            name: spec.name.clone(),
                            reason: err.to_string(),
                        })?
                }
            };
            values.push((spec.name.clone(), value));
        }
        Ok(ArgumentSet::new(values))
    }
}

pub(super) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
