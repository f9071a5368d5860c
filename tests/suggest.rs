mod common;

use cmdhub_core::commands::{ArgumentType, CommandNode, ResolverRegistry, VisibilityPolicy};
use common::*;
use std::sync::{Arc, Mutex};

fn shop() -> CommandNode {
    CommandNode::literal("shop")
        .then(CommandNode::literal("buy").executes(|ctx| ctx.reply("bought")))
        .then(CommandNode::literal("Balance").executes(|ctx| ctx.reply("0 coins")))
        .then(
            CommandNode::literal("admin")
                .require_permission("shop.admin")
                .visibility(VisibilityPolicy::IfExecutable)
                .executes(|ctx| ctx.reply("admin")),
        )
}

fn give() -> CommandNode {
    CommandNode::literal("give")
        .argument("target", ArgumentType::Player)
        .argument("amount", ArgumentType::Integer)
        .optional_argument("silent", ArgumentType::Boolean)
        .executes(|ctx| ctx.reply("given"))
}

#[test]
fn empty_token_lists_visible_children_sorted() {
    let fixture = Fixture::new();
    fixture.register("shop", single(shop()));
    let player = RecordingSender::player("Steve");

    assert_eq!(fixture.suggest(&player, "shop", &[""]), ["Balance", "buy"]);
    assert_eq!(fixture.suggest(&player, "shop", &[]), ["Balance", "buy"]);
}

#[test]
fn children_are_filtered_by_prefix_ignoring_case() {
    let fixture = Fixture::new();
    fixture.register("shop", single(shop()));
    let admin = RecordingSender::player("Steve").grant("shop.admin");

    assert_eq!(fixture.suggest(&admin, "shop", &["B"]), ["Balance", "buy"]);
    assert_eq!(fixture.suggest(&admin, "shop", &["ba"]), ["Balance"]);
    assert_eq!(fixture.suggest(&admin, "shop", &["a"]), ["admin"]);
    assert!(fixture.suggest(&admin, "shop", &["x"]).is_empty());
}

#[test]
fn suggestion_does_not_run_handlers() {
    let runs = Arc::new(Mutex::new(0));
    let counter = runs.clone();
    let root = CommandNode::literal("count")
        .optional_argument("flag", ArgumentType::Boolean)
        .executes(move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });
    let fixture = Fixture::new();
    fixture.register("count", single(root));
    let sender = RecordingSender::console();

    assert_eq!(fixture.suggest(&sender, "count", &[""]), ["true", "false"]);
    assert_eq!(*runs.lock().unwrap(), 0);
    assert!(sender.messages().is_empty());
}

#[test]
fn custom_suggester_takes_priority() {
    let seen: Arc<Mutex<Vec<(String, Vec<String>)>>> = Arc::new(Mutex::new(Vec::new()));
    let inner = seen.clone();
    let root = CommandNode::literal("warp")
        .then(
            CommandNode::literal("to")
                .argument("name", ArgumentType::String)
                .executes(|ctx| ctx.reply("warped"))
                .then(CommandNode::literal("spawn"))
                .suggests(move |_, root, args| {
                    let args = args.iter().map(|s| s.to_string()).collect();
                    inner.lock().unwrap().push((root.to_string(), args));
                    vec!["home".to_string(), "mine".to_string()]
                }),
        );
    let fixture = Fixture::new();
    fixture.register("warp", single(root));
    let sender = RecordingSender::console();

    assert_eq!(fixture.suggest(&sender, "warp", &["to", "h"]), ["home", "mine"]);
    assert_eq!(
        *seen.lock().unwrap(),
        [("warp".to_string(), vec!["to".to_string(), "h".to_string()])]
    );
}

#[test]
fn panicking_suggester_yields_nothing() {
    let root = CommandNode::literal("boom")
        .executes(|ctx| ctx.reply("boom"))
        .suggests(|_, _, _| panic!("suggester exploded"));
    let fixture = Fixture::new();
    fixture.register("boom", single(root));

    assert!(fixture.suggest(&RecordingSender::console(), "boom", &[""]).is_empty());
}

#[test]
fn argument_index_counts_tokens_after_the_literal_path() {
    let fixture = Fixture::new();
    fixture.register("items", single(give()));
    let sender = RecordingSender::console();

    // A fresh token completes the parameter it starts.
    assert_eq!(
        fixture.suggest(&sender, "give", &[""]),
        ["Alice", "albert", "Bob"]
    );
    assert!(fixture.suggest(&sender, "give", &["Bob", ""]).is_empty());
    assert_eq!(
        fixture.suggest(&sender, "give", &["Bob", "5", ""]),
        ["true", "false"]
    );
    assert!(fixture.suggest(&sender, "give", &["Bob", "5", "true", ""]).is_empty());

    // A partial token counts as supplied, so it indexes one parameter further.
    assert!(fixture.suggest(&sender, "give", &["al"]).is_empty());
    assert!(fixture.suggest(&sender, "give", &["Bob", "5", "t"]).is_empty());
    assert_eq!(fixture.suggest(&sender, "give", &["Bob", "f"]), ["false"]);
}

#[test]
fn argument_suggestions_respect_policy_gates() {
    let root = CommandNode::literal("tp")
        .then(
            CommandNode::literal("player")
                .player_only()
                .argument("target", ArgumentType::Player)
                .executes(|ctx| ctx.reply("teleported")),
        )
        .then(
            CommandNode::literal("world")
                .require_permission("tp.world")
                .argument("target", ArgumentType::World)
                .executes(|ctx| ctx.reply("teleported")),
        )
        .then(
            CommandNode::literal("off")
                .enabled_by_default(false)
                .argument("target", ArgumentType::Player)
                .executes(|ctx| ctx.reply("teleported")),
        );
    let fixture = Fixture::new();
    fixture.register("tp", single(root));
    let console = RecordingSender::console();
    let player = RecordingSender::player("Steve");

    assert!(fixture.suggest(&console, "tp", &["player", ""]).is_empty());
    assert_eq!(
        fixture.suggest(&player, "tp", &["player", ""]),
        ["Alice", "albert", "Bob"]
    );

    assert!(fixture.suggest(&player, "tp", &["world", ""]).is_empty());
    assert_eq!(
        fixture.suggest(&console, "tp", &["world", ""]),
        ["lobby", "world", "world_nether"]
    );

    assert!(fixture.suggest(&console, "tp", &["off", ""]).is_empty());
}

#[test]
fn disabled_children_are_hidden_unless_shown_when_disabled() {
    let root = CommandNode::literal("event")
        .then(
            CommandNode::literal("join")
                .enabled_config_path("commands.{root}.join.enabled")
                .executes(|ctx| ctx.reply("joined")),
        )
        .then(
            CommandNode::literal("leave")
                .enabled_by_default(false)
                .show_when_disabled()
                .executes(|ctx| ctx.reply("left")),
        )
        .then(
            CommandNode::literal("admin")
                .player_only()
                .executes(|ctx| ctx.reply("admin")),
        )
        .then(
            CommandNode::literal("stats")
                .player_only()
                .show_to_console()
                .executes(|ctx| ctx.reply("stats")),
        );
    let fixture = Fixture::new();
    fixture.register("events", single(root));
    let console = RecordingSender::console();

    assert_eq!(
        fixture.suggest(&console, "event", &[""]),
        ["join", "leave", "stats"]
    );

    fixture.config.set_bool("events", "commands.event.join.enabled", false);
    assert_eq!(fixture.suggest(&console, "event", &[""]), ["leave", "stats"]);
}

#[test]
fn suggestion_walk_matches_dispatch() {
    let root = CommandNode::literal("a").then(
        CommandNode::literal("b")
            .then(CommandNode::literal("c").executes(|ctx| ctx.reply("c")))
            .then(CommandNode::literal("cc").executes(|ctx| ctx.reply("cc"))),
    );
    let fixture = Fixture::new();
    fixture.register("chain", single(root));
    let sender = RecordingSender::console();

    assert_eq!(fixture.suggest(&sender, "a", &["b", "c"]), Vec::<String>::new());
    assert!(fixture.suggest(&sender, "a", &["b", "x"]).is_empty());
    assert_eq!(fixture.suggest(&sender, "a", &["b", ""]), ["c", "cc"]);
    assert_eq!(fixture.suggest(&sender, "a", &["B", "C"]), Vec::<String>::new());
}

#[test]
fn unknown_resolver_suggests_nothing() {
    let fixture = Fixture::with_resolvers(ResolverRegistry::new());
    fixture.register("items", single(give()));
    let sender = RecordingSender::console();

    assert!(fixture.suggest(&sender, "give", &[""]).is_empty());
    assert!(fixture.suggest(&sender, "give", &["Bob", "5", ""]).is_empty());
}
