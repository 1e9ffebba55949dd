//! Behaviour-driven tests for plugin chain execution.

use std::sync::Arc;

use courier_core::{Container, RouteError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::{CallLog, RecordingPlugin};
use crate::chain::{PluginChain, ScopedPlugin};
use crate::hook::{Hook, HookContext};
use crate::scope::Operations;

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    chain: PluginChain,
    log: CallLog,
    outcome: Option<Result<(), RouteError>>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

fn parse_priority(value: &str) -> i32 {
    unquote(value).parse().expect("numeric priority")
}

fn recording(world: &TestWorld, name: &str) -> RecordingPlugin {
    RecordingPlugin::new(unquote(name), &world.log)
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a plugin {name} at priority {priority}")]
fn given_plugin(world: &mut TestWorld, name: String, priority: String) {
    let plugin = recording(world, &name);
    world
        .chain
        .add(ScopedPlugin::new(Arc::new(plugin)).with_priority(parse_priority(&priority)));
}

#[given("a whitelisted plugin {name} at priority {priority} for unit {unit} operation {operation}")]
fn given_whitelisted(
    world: &mut TestWorld,
    name: String,
    priority: String,
    unit: String,
    operation: String,
) {
    let plugin = recording(world, &name);
    let entries = [(
        unquote(&unit).to_owned(),
        Operations::only([unquote(&operation)]),
    )]
    .into_iter()
    .collect();
    world.chain.add(
        ScopedPlugin::new(Arc::new(plugin))
            .with_priority(parse_priority(&priority))
            .with_whitelist(entries),
    );
}

#[given("a blacklisted plugin {name} at priority {priority} for unit {unit}")]
fn given_blacklisted(world: &mut TestWorld, name: String, priority: String, unit: String) {
    let plugin = recording(world, &name);
    let entries = [(unquote(&unit).to_owned(), Operations::All)]
        .into_iter()
        .collect();
    world.chain.add(
        ScopedPlugin::new(Arc::new(plugin))
            .with_priority(parse_priority(&priority))
            .with_blacklist(entries),
    );
}

#[given("a rejecting plugin {name} at priority {priority}")]
fn given_rejecting(world: &mut TestWorld, name: String, priority: String) {
    let plugin = recording(world, &name).failing_on("after_handler_selected");
    world
        .chain
        .add(ScopedPlugin::new(Arc::new(plugin)).with_priority(parse_priority(&priority)));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the after-handler-selected hook runs for unit {unit} and operation {operation}")]
fn when_hook_runs(world: &mut TestWorld, unit: String, operation: String) {
    let mut cx = HookContext::new("jsonrpc", Arc::new(Container::new()));
    cx.set_unit(unquote(&unit));
    cx.set_operation(unquote(&operation));
    world.outcome = Some(world.chain.invoke(Hook::AfterHandlerSelected, &mut cx));
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the hooks ran in order {order}")]
fn then_order(world: &mut TestWorld, order: String) {
    let expected: Vec<String> = unquote(&order)
        .split(',')
        .map(|name| format!("{name}:after_handler_selected"))
        .collect();
    assert_eq!(world.log.entries(), expected);
}

#[then("the hook fails with an access denied error")]
fn then_access_denied(world: &mut TestWorld) {
    let outcome = world.outcome.as_ref().expect("hook ran");
    assert!(
        matches!(outcome, Err(RouteError::AccessDenied { .. })),
        "expected access denied, got {outcome:?}"
    );
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/plugin_chain.feature",
    name = "Plugins run in priority order with stable ties"
)]
fn priority_order(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_chain.feature",
    name = "Whitelisted plugin is skipped for other operations"
)]
fn whitelist_scope(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_chain.feature",
    name = "Blacklisted plugin is skipped for the whole unit"
)]
fn blacklist_scope(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_chain.feature",
    name = "A failing plugin stops the chain"
)]
fn failing_plugin(world: TestWorld) {
    let _ = world;
}
