use crate::commands::{
    ModuleId, context::CommandSender, executor::ExecutionEngine, executor::panic_message,
    node::CommandNode,
};
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

impl ExecutionEngine {
    /// Completion candidates for the last token of `args`. Walks the tree
    /// exactly like [`ExecutionEngine::execute`] and never runs a handler.
    pub fn suggest(
        &self,
        owner: &ModuleId,
        sender: &dyn CommandSender,
        root: &CommandNode,
        args: &[&str],
    ) -> Vec<String> {
        let (node, consumed) = root.walk(args);
        let prefix = args.last().copied().unwrap_or("");

        if let Some(suggester) = &node.suggester {
            return panic::catch_unwind(AssertUnwindSafe(|| suggester(sender, root.name(), args)))
                .unwrap_or_else(|payload| {
                    warn!(
                        "Suggester of '{}' ({}) panicked: {}",
                        node.name(),
                        owner,
                        panic_message(payload.as_ref())
                    );
                    Vec::new()
                });
        }

        let policy = self.policy(owner, root, sender);

        // The last token did not match a child, so it is still a literal being typed.
        let typing_literal = consumed < args.len();
        if node.has_children() && (args.is_empty() || typing_literal) {
            return policy.visible_children(node, prefix);
        }

        if !node.has_executor() {
            return Vec::new();
        }

        let mut arg_index = args.len().saturating_sub(consumed);
        if prefix.is_empty() {
            arg_index = arg_index.saturating_sub(1);
        }
        let Some(spec) = node.params.get(arg_index) else {
            return Vec::new();
        };

        if !policy.allows_argument_suggestions(node) {
            return Vec::new();
        }

        match self.resolvers().resolver_for(spec.arg_type) {
            Some(resolver) => resolver.suggest(sender, prefix),
            None => Vec::new(),
        }
    }
}
