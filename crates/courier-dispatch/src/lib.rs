//! Request dispatch for Courier.
//!
//! The [`Dispatcher`] owns an ordered list of [`Handler`]s. For each inbound
//! [`courier_core::Request`] it selects the first handler of the request's
//! execution mode that claims it, drives the handler's plugin chain through
//! the lifecycle hooks, and turns the outcome (success or failure) into a
//! [`courier_core::Response`].
//!
//! Two handlers ship with the crate:
//!
//! - [`JsonRpcProtocol`] serves JSON-RPC 1.0/2.0 over `POST`, with batching,
//!   notifications and version-aware responses.
//! - [`CommandHandler`] serves `unit:operation` tasks in command mode.
//!
//! Handlers find their targets through an [`OperationResolver`]. Production
//! setups describe handlers and plugins in a [`courier_config::Config`] and
//! assemble everything with [`Bootstrap`].
//!
//! ```text
//! Config ──▶ Bootstrap ──▶ Dispatcher ──▶ [JsonRpcProtocol, CommandHandler, ...]
//!                │                              │
//!     HandlerRegistry / PluginRegistry    PluginChain + OperationResolver
//! ```

pub mod bootstrap;
pub mod command;
pub mod dispatcher;
pub mod encoder;
pub mod handler;
pub mod jsonrpc;
pub mod registry;
pub mod resolver;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use self::bootstrap::{
    ArgsConfigLoader, Bootstrap, BootstrapError, ConfigLoader, Courier, FileConfigLoader,
    bootstrap_with,
};
pub use self::command::CommandHandler;
pub use self::dispatcher::{Dispatcher, NO_HANDLER_MESSAGE};
pub use self::encoder::{Encoder, JsonEncoder, TextEncoder};
pub use self::handler::{Handler, RouteMatch};
pub use self::jsonrpc::JsonRpcProtocol;
pub use self::registry::{HandlerFactory, HandlerParts, HandlerRegistry};
pub use self::resolver::{MethodTable, Operation, OperationResolver, Unit, UnitRegistry};
pub use self::telemetry::{TelemetryError, TelemetryHandle};
