use super::Host;
use crate::commands::{
    ArgumentType, CommandError, CommandNode, CommandRegistry, CommandResult, ExecutionContext,
    ModuleId, RegistrationError, VisibilityPolicy,
};
use std::sync::{Arc, Weak};

pub const OWNER: &str = "cmdhub";
pub const ADMIN_PERMISSION: &str = "cmdhub.admin";

pub(super) fn register(host: &Arc<Host>) -> Result<(), RegistrationError> {
    let registry = commands(Arc::downgrade(host));
    host.service().register(&ModuleId::new(OWNER), registry)
}

fn upgrade(host: &Weak<Host>) -> CommandResult<Arc<Host>> {
    host.upgrade()
        .ok_or_else(|| CommandError::internal("host is gone"))
}

fn commands(host: Weak<Host>) -> CommandRegistry {
    let help_host = host.clone();
    let help_suggest_host = host.clone();
    let modules_host = host.clone();
    let reload_host = host;

    let root = CommandNode::literal("cmdhub")
        .alias("hub")
        .description("Command hub administration")
        .then(
            CommandNode::literal("help")
                .description("List commands, or the subcommands of one command")
                .optional_argument("command", ArgumentType::String)
                .executes(move |ctx| {
                    let host = upgrade(&help_host)?;
                    help(&host, ctx)
                })
                .suggests(move |_, _, args| {
                    let (Some(host), [_, prefix]) = (help_suggest_host.upgrade(), args) else {
                        return Vec::new();
                    };
                    host.complete_label(prefix)
                }),
        )
        .then(
            CommandNode::literal("modules")
                .description("List modules and the commands they own")
                .require_permission(ADMIN_PERMISSION)
                .visibility(VisibilityPolicy::IfExecutable)
                .executes(move |ctx| {
                    let host = upgrade(&modules_host)?;
                    modules(&host, ctx)
                }),
        )
        .then(
            CommandNode::literal("reload")
                .description("Re-read command aliases from module configs")
                .require_permission(ADMIN_PERMISSION)
                .executes(move |ctx| {
                    let count = upgrade(&reload_host)?.refresh();
                    ctx.reply(&format!("Reloaded {} command(s).", count))
                }),
        );

    let mut registry = CommandRegistry::new();
    registry.register(root);
    registry
}

fn help(host: &Host, ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
    let query = ctx.args().get_string("command")?;
    if query.is_empty() {
        ctx.reply("Commands:")?;
        for entry in host.entries() {
            let mut line = format!("/{}", entry.label);
            if !entry.aliases.is_empty() {
                line.push_str(&format!(" ({})", entry.aliases.join(", ")));
            }
            if !entry.description.is_empty() {
                line.push_str(&format!(" - {}", entry.description));
            }
            ctx.reply(&line)?;
        }
        return Ok(());
    }

    let Some(command) = host.command(&query) else {
        return Err(CommandError::runtime(format!("Unknown command: {}", query)));
    };
    let subcommands = command.subcommands(ctx.sender());
    if subcommands.is_empty() {
        return ctx.reply(&format!("/{} has no subcommands.", command.label()));
    }
    ctx.reply(&format!("Subcommands of /{}:", command.label()))?;
    for (name, description) in subcommands {
        match description {
            Some(description) => ctx.reply(&format!("  {} - {}", name, description))?,
            None => ctx.reply(&format!("  {}", name))?,
        }
    }
    Ok(())
}

fn modules(host: &Host, ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
    let modules = host.service().modules();
    ctx.reply(&format!("Modules ({}):", modules.len()))?;
    for (owner, roots) in modules {
        ctx.reply(&format!("  {}: {}", owner, roots.join(", ")))?;
    }
    Ok(())
}
