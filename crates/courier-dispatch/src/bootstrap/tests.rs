//! Unit tests for dispatcher assembly.

use std::fs;

use mockall::mock;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::tests::sample_units;

mock! {
    Loader {}
    impl ConfigLoader for Loader {
        fn load(&self) -> Result<Config, ConfigError>;
    }
}

fn resolver() -> Arc<dyn OperationResolver> {
    Arc::new(sample_units())
}

fn config(json: &str) -> Config {
    Config::from_json_str(json).expect("valid config")
}

#[fixture]
fn two_handlers() -> Config {
    config(
        r#"{"handlers": [
            {"kind": "jsonrpc", "name": "api", "base_path": "/rpc", "plugins": [
                {"kind": "trace", "priority": 5},
                {"kind": "headers", "priority": -1, "whitelist": {"math": ["add"]},
                 "options": {"headers": {"X-Math": "1"}}}
            ]},
            {"kind": "command"}
        ]}"#,
    )
}

#[rstest]
fn builds_handlers_in_configured_order(two_handlers: Config) {
    let dispatcher = Bootstrap::new()
        .build(&two_handlers, resolver())
        .expect("dispatcher");
    assert_eq!(dispatcher.handler_names(), vec!["api", "command"]);
}

#[rstest]
fn plugins_are_ordered_and_scoped(two_handlers: Config) {
    let handler = two_handlers.handlers().first().expect("api handler");
    let chain = build_chain(handler, &PluginRegistry::with_builtins()).expect("chain");

    assert_eq!(chain.names(), vec!["headers", "trace"]);
    let headers = chain.iter().next().expect("headers plugin");
    assert!(headers.supports("math", "add"));
    assert!(!headers.supports("math", "echo"));
}

#[test]
fn unknown_handler_kind_fails_fast() {
    let error = Bootstrap::new()
        .build(&config(r#"{"handlers": [{"kind": "soap"}]}"#), resolver())
        .expect_err("unknown kind");
    assert!(matches!(error, BootstrapError::UnknownHandler { ref kind } if kind == "soap"));
}

#[test]
fn unknown_plugin_kind_names_the_handler() {
    let error = Bootstrap::new()
        .build(
            &config(
                r#"{"handlers": [
                    {"kind": "jsonrpc", "name": "api", "plugins": [{"kind": "cors"}]}
                ]}"#,
            ),
            resolver(),
        )
        .expect_err("unknown plugin");
    assert_eq!(
        error.to_string(),
        "failed to build plugins for handler 'api': plugin kind 'cors' is not registered"
    );
}

#[test]
fn unvalidated_config_is_checked_again() {
    let mut config = Config::default();
    config.handlers.push(HandlerConfig::new(""));

    let error = Bootstrap::new()
        .build(&config, resolver())
        .expect_err("empty kind");
    assert!(matches!(
        error,
        BootstrapError::Configuration {
            source: ConfigError::EmptyKind { .. }
        }
    ));
}

#[test]
fn container_services_reach_the_dispatcher() {
    let mut bootstrap = Bootstrap::new();
    bootstrap.container_mut().set("tenant", String::from("acme"));

    let dispatcher = bootstrap
        .build(&Config::default(), resolver())
        .expect("dispatcher");

    let tenant = dispatcher.container().get::<String>("tenant").expect("tenant");
    assert_eq!(tenant.as_str(), "acme");
}

#[test]
fn run_loads_once_and_builds() {
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .times(1)
        .returning(|| {
            Ok(Config::from_json_str(r#"{"handlers": [{"kind": "command"}]}"#).expect("config"))
        });

    let courier = bootstrap_with(&loader, resolver()).expect("bootstrap");

    assert_eq!(courier.config().handlers().len(), 1);
    let response = courier
        .handle(&Request::command("math:echo", ["ping"]))
        .expect("response");
    assert_eq!(response.body(), "ping");
}

#[test]
fn loader_failure_is_reported() {
    let mut loader = MockLoader::new();
    loader.expect_load().returning(|| {
        Err(ConfigError::EmptyKind {
            location: "handlers[0]".to_owned(),
        })
    });

    let error = bootstrap_with(&loader, resolver())
        .err()
        .expect("load failure");
    assert_eq!(
        error.to_string(),
        "failed to load configuration: handlers[0] has an empty kind"
    );
}

#[test]
fn file_loader_reads_toml() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("courier.toml");
    fs::write(&path, "log_filter = \"debug\"\n\n[[handlers]]\nkind = \"jsonrpc\"\n")
        .expect("write config");

    let config = FileConfigLoader::new(&path).load().expect("load");

    assert_eq!(config.handlers().len(), 1);
    assert!(!config.log_filter().is_empty());
}

#[test]
fn args_loader_reports_invalid_files() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("courier.toml");
    fs::write(&path, "[[handlers]]\nkind = \"\"\n").expect("write config");

    let loader = ArgsConfigLoader::new([
        OsString::from("courier"),
        OsString::from("--config-path"),
        path.into_os_string(),
    ]);

    let error = loader.load().expect_err("empty kind");
    assert!(matches!(error, ConfigError::EmptyKind { .. }), "got {error:?}");
}
