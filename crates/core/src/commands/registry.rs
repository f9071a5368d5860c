use super::node::CommandNode;
use indexmap::IndexMap;
use std::sync::Arc;

/// The command trees of one module, keyed by lower-cased root name.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    roots: IndexMap<String, Arc<CommandNode>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root, replacing any root with the same name.
    pub fn register(&mut self, command: CommandNode) {
        self.roots
            .insert(command.name().to_lowercase(), Arc::new(command));
    }

    /// Walks `path` (whitespace separated literals), creating missing nodes,
    /// and returns the node at its end. `None` for a blank path.
    pub fn path_mut(&mut self, path: &str) -> Option<&mut CommandNode> {
        let mut tokens = path.split_whitespace();
        let root_name = tokens.next()?;
        let root = self
            .roots
            .entry(root_name.to_lowercase())
            .or_insert_with(|| Arc::new(CommandNode::literal(root_name)));
        let mut node = Arc::make_mut(root);
        for token in tokens {
            node = node.child_or_create(token);
        }
        Some(node)
    }

    pub fn get_root(&self, name: &str) -> Option<&Arc<CommandNode>> {
        self.roots.get(&name.to_lowercase())
    }

    pub fn roots(&self) -> impl Iterator<Item = &Arc<CommandNode>> {
        self.roots.values()
    }

    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.roots.values().map(|root| root.name())
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
