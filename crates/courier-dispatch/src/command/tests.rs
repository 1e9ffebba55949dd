use courier_core::Container;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::dispatcher::Dispatcher;
use crate::tests::{HookLog, Probe, sample_units};

#[fixture]
fn handler() -> CommandHandler {
    CommandHandler::new(Arc::new(sample_units()))
}

#[rstest]
#[case::no_separator("math")]
#[case::empty_operation("math:")]
#[case::empty_unit(":add")]
#[case::unknown_unit("text:add")]
#[case::unknown_operation("math:divide")]
fn declines_unknown_tasks(handler: CommandHandler, #[case] task: &str) {
    let request = Request::command(task, Vec::<String>::new());
    assert!(handler.is_appropriate(&request).is_none());
}

#[rstest]
fn match_carries_arguments(handler: CommandHandler) {
    let route = handler
        .is_appropriate(&Request::command("math:add", ["4", "5"]))
        .expect("claimed");
    assert_eq!(route.unit(), "math");
    assert_eq!(route.operation(), Some("add"));
    assert_eq!(route.payload(), &json!(["4", "5"]));
}

#[rstest]
fn nested_unit_keys_split_on_first_separator(handler: CommandHandler) {
    let route = handler
        .is_appropriate(&Request::command("v1/admin:reset", Vec::<String>::new()))
        .expect("claimed");
    assert_eq!(route.unit(), "v1/admin");
}

#[test]
fn dispatch_runs_invoke_hooks_and_encodes_text() {
    let log = HookLog::default();
    let mut chain = PluginChain::new();
    chain.add(Probe::new(&log).scoped());
    let dispatcher = Dispatcher::new(Arc::new(Container::new()))
        .with_handler(CommandHandler::new(Arc::new(sample_units())).with_plugins(chain));

    let response = dispatcher
        .handle(&Request::command("math:add", ["4", "5"]))
        .expect("response");

    assert_eq!(response.body(), "9");
    assert_eq!(response.status(), 200);
    assert_eq!(
        log.entries(),
        vec![
            "after_handler_selected(add)",
            "before_invoke(add)",
            "after_invoke(add)",
            "after_full_route_invoked(add)",
        ]
    );
}

#[test]
fn operation_failure_renders_message_as_text() {
    let dispatcher = Dispatcher::new(Arc::new(Container::new()))
        .with_handler(CommandHandler::new(Arc::new(sample_units())));

    let response = dispatcher
        .handle(&Request::command("math:add", ["four"]))
        .expect("recovered");

    assert_eq!(response.body(), "add expects two integers");
    assert_eq!(response.status(), 400);
    assert!(
        response
            .header("Content-Type")
            .is_some_and(|value| value.starts_with("text/plain"))
    );
}
