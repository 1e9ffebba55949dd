//! Assembly of a dispatcher from configuration.
//!
//! [`Bootstrap`] owns the registries and the service container during setup.
//! [`Bootstrap::build`] walks the configured handlers in order, builds each
//! plugin through the [`PluginRegistry`], attaches priorities and scopes, and
//! hands the finished chain to the handler factory. Unknown kinds fail here,
//! before any request is served.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use courier_config::{Config, ConfigError, HandlerConfig, PluginConfig, ScopeEntries, ScopeEntry};
use courier_core::{Container, Request, Response, RouteError};
use courier_plugins::{Operations, PluginChain, PluginError, PluginRegistry, ScopeMap, ScopedPlugin};
use thiserror::Error;
use tracing::{debug, info};

use crate::dispatcher::Dispatcher;
use crate::registry::{HandlerParts, HandlerRegistry};
use crate::resolver::OperationResolver;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Abstracts configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's configuration error.
    fn load(&self) -> Result<Config, ConfigError>;
}

/// Loads a TOML file layered under `COURIER_*` environment variables.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    path: PathBuf,
}

impl FileConfigLoader {
    /// Creates a loader for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Config::load_file(&self.path)
    }
}

/// Loads configuration from a command line: `--config-path`, the
/// environment, then `--log-filter` and `--log-format`.
#[derive(Debug, Clone)]
pub struct ArgsConfigLoader {
    args: Vec<OsString>,
}

impl ArgsConfigLoader {
    /// Creates a loader for `args`, program name first.
    #[must_use]
    pub fn new<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl ConfigLoader for ArgsConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Config::load_layered(self.args.iter().cloned())
    }
}

/// Errors surfaced while assembling the dispatcher.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load or validate.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying configuration error.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// A handler kind has no registered factory.
    #[error("unknown handler kind '{kind}'")]
    UnknownHandler {
        /// Requested kind.
        kind: String,
    },
    /// A handler kind was registered twice.
    #[error("handler kind '{kind}' is already registered")]
    DuplicateHandler {
        /// Duplicated kind.
        kind: String,
    },
    /// A plugin could not be built for a handler.
    #[error("failed to build plugins for handler '{handler}': {source}")]
    Plugin {
        /// Handler the plugin was attached to.
        handler: String,
        /// Underlying plugin error.
        #[source]
        source: PluginError,
    },
}

/// Setup-time owner of registries and services.
#[derive(Debug)]
pub struct Bootstrap {
    handlers: HandlerRegistry,
    plugins: PluginRegistry,
    container: Container,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            handlers: HandlerRegistry::with_builtins(),
            plugins: PluginRegistry::with_builtins(),
            container: Container::new(),
        }
    }
}

impl Bootstrap {
    /// Creates a bootstrap with the built-in handler and plugin kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler registry, for registering custom kinds.
    pub const fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    /// Plugin registry, for registering custom kinds.
    pub const fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Service container; writable only until [`Bootstrap::build`].
    pub const fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Builds the dispatcher described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Configuration`] when `config` fails
    /// validation, [`BootstrapError::UnknownHandler`] or
    /// [`BootstrapError::Plugin`] when a kind cannot be built.
    pub fn build(
        self,
        config: &Config,
        resolver: Arc<dyn OperationResolver>,
    ) -> Result<Dispatcher, BootstrapError> {
        config
            .validate()
            .map_err(|source| BootstrapError::Configuration { source })?;

        let mut dispatcher = Dispatcher::new(Arc::new(self.container));
        for handler in config.handlers() {
            let parts = HandlerParts {
                name: handler.name().to_owned(),
                base_path: handler.base_path.clone(),
                plugins: build_chain(handler, &self.plugins)?,
                resolver: Arc::clone(&resolver),
            };
            debug!(
                target: BOOTSTRAP_TARGET,
                kind = handler.kind.as_str(),
                name = handler.name(),
                plugins = ?parts.plugins.names(),
                "building handler"
            );
            dispatcher.add_handler(self.handlers.create(&handler.kind, parts)?);
        }

        info!(
            target: BOOTSTRAP_TARGET,
            handlers = ?dispatcher.handler_names(),
            "dispatcher ready"
        );
        Ok(dispatcher)
    }

    /// Loads configuration, initialises telemetry and builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns the first loading, telemetry or assembly error.
    pub fn run(
        self,
        loader: &dyn ConfigLoader,
        resolver: Arc<dyn OperationResolver>,
    ) -> Result<Courier, BootstrapError> {
        let config = loader
            .load()
            .map_err(|source| BootstrapError::Configuration { source })?;
        let telemetry = telemetry::initialise(&config)
            .map_err(|source| BootstrapError::Telemetry { source })?;
        let dispatcher = self.build(&config, resolver)?;
        Ok(Courier {
            config,
            dispatcher,
            telemetry,
        })
    }
}

/// Bootstraps with the built-in kinds and an empty container.
///
/// # Errors
///
/// See [`Bootstrap::run`].
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    resolver: Arc<dyn OperationResolver>,
) -> Result<Courier, BootstrapError> {
    Bootstrap::new().run(loader, resolver)
}

/// A ready-to-serve dispatcher with its resolved configuration.
#[derive(Debug)]
pub struct Courier {
    config: Config,
    dispatcher: Dispatcher,
    telemetry: TelemetryHandle,
}

impl Courier {
    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Assembled dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Telemetry handle, mainly useful in tests.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Dispatches one request.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub fn handle(&self, request: &Request) -> Result<Response, RouteError> {
        self.dispatcher.handle(request)
    }
}

fn build_chain(
    handler: &HandlerConfig,
    registry: &PluginRegistry,
) -> Result<PluginChain, BootstrapError> {
    handler
        .plugins
        .iter()
        .map(|plugin| {
            build_plugin(plugin, registry).map_err(|source| BootstrapError::Plugin {
                handler: handler.name().to_owned(),
                source,
            })
        })
        .collect()
}

fn build_plugin(
    config: &PluginConfig,
    registry: &PluginRegistry,
) -> Result<ScopedPlugin, PluginError> {
    let plugin = registry.create(&config.kind, &config.options)?;
    let mut scoped = ScopedPlugin::new(plugin).with_priority(config.priority);
    if let Some(entries) = &config.whitelist {
        scoped = scoped.with_whitelist(scope_map(entries));
    } else if let Some(entries) = &config.blacklist {
        scoped = scoped.with_blacklist(scope_map(entries));
    }
    Ok(scoped)
}

fn scope_map(entries: &ScopeEntries) -> ScopeMap {
    entries
        .iter()
        .map(|(unit, entry)| {
            let operations = match entry {
                ScopeEntry::Operations(names) => Operations::only(names.iter().cloned()),
                // Validation admits no token other than "*".
                ScopeEntry::Token(_) => Operations::All,
            };
            (unit.clone(), operations)
        })
        .collect()
}

#[cfg(test)]
mod tests;
