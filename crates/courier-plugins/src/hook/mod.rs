//! Lifecycle hooks and the plugin trait.
//!
//! The hook set is closed: every point at which the dispatcher or a handler
//! consults plugins is a [`Hook`] variant. [`Hook::dispatch`] maps a variant to
//! the matching [`Plugin`] method, so the chain never looks hooks up by name.

mod context;

use courier_core::{Params, RouteError};
use serde_json::Value;

pub use self::context::HookContext;

/// Outcome of a single hook call.
pub type HookResult = Result<(), RouteError>;

/// A lifecycle point at which plugins are consulted.
#[derive(Debug, Clone, Copy)]
pub enum Hook<'a> {
    /// A handler has claimed the request.
    AfterHandlerSelected,
    /// A handler is about to resolve the target operation.
    BeforeResolve,
    /// The target operation has been resolved.
    AfterResolve,
    /// The operation is about to be called with these parameters.
    BeforeInvoke(&'a Params),
    /// The operation returned; carries the response object built for it.
    AfterInvoke(&'a Value),
    /// The handler produced the encoded body for the whole request.
    AfterFullRouteInvoked(&'a str),
    /// Routing failed with this error.
    ErrorOccurred(&'a RouteError),
}

impl Hook<'_> {
    /// Returns the canonical hook name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AfterHandlerSelected => "after_handler_selected",
            Self::BeforeResolve => "before_resolve",
            Self::AfterResolve => "after_resolve",
            Self::BeforeInvoke(_) => "before_invoke",
            Self::AfterInvoke(_) => "after_invoke",
            Self::AfterFullRouteInvoked(_) => "after_full_route_invoked",
            Self::ErrorOccurred(_) => "error_occurred",
        }
    }

    /// Calls the plugin method corresponding to this hook.
    ///
    /// # Errors
    ///
    /// Returns whatever error the plugin raises.
    pub fn dispatch(self, plugin: &dyn Plugin, cx: &mut HookContext) -> HookResult {
        match self {
            Self::AfterHandlerSelected => plugin.after_handler_selected(cx),
            Self::BeforeResolve => plugin.before_resolve(cx),
            Self::AfterResolve => plugin.after_resolve(cx),
            Self::BeforeInvoke(params) => plugin.before_invoke(cx, params),
            Self::AfterInvoke(response) => plugin.after_invoke(cx, response),
            Self::AfterFullRouteInvoked(body) => plugin.after_full_route_invoked(cx, body),
            Self::ErrorOccurred(error) => plugin.error_occurred(cx, error),
        }
    }
}

/// A cross-cutting observer invoked at fixed lifecycle points.
///
/// Every hook defaults to a no-op. Plugins are shared across requests, so
/// per-request effects belong in the [`HookContext`] (for example response
/// headers), never in plugin fields.
///
/// # Example
///
/// ```
/// use courier_core::RouteError;
/// use courier_plugins::{HookContext, HookResult, Plugin};
///
/// struct RequireToken;
///
/// impl Plugin for RequireToken {
///     fn name(&self) -> &str {
///         "require-token"
///     }
///
///     fn after_handler_selected(&self, cx: &mut HookContext) -> HookResult {
///         if cx.container().contains("token") {
///             Ok(())
///         } else {
///             Err(RouteError::unauthorized("missing token"))
///         }
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Identifies the plugin in logs.
    fn name(&self) -> &str;

    /// Runs once a handler has claimed the request.
    ///
    /// # Errors
    ///
    /// An error aborts the route and is turned into an error response.
    fn after_handler_selected(&self, _cx: &mut HookContext) -> HookResult {
        Ok(())
    }

    /// Runs before the target operation is resolved.
    ///
    /// # Errors
    ///
    /// An error fails the current operation.
    fn before_resolve(&self, _cx: &mut HookContext) -> HookResult {
        Ok(())
    }

    /// Runs after the target operation is resolved.
    ///
    /// # Errors
    ///
    /// An error fails the current operation.
    fn after_resolve(&self, _cx: &mut HookContext) -> HookResult {
        Ok(())
    }

    /// Runs immediately before the operation is called.
    ///
    /// # Errors
    ///
    /// An error fails the current operation without calling it.
    fn before_invoke(&self, _cx: &mut HookContext, _params: &Params) -> HookResult {
        Ok(())
    }

    /// Runs after the operation returned, with the response object built
    /// for it.
    ///
    /// # Errors
    ///
    /// An error fails the current operation.
    fn after_invoke(&self, _cx: &mut HookContext, _response: &Value) -> HookResult {
        Ok(())
    }

    /// Runs once the encoded body for the whole request exists.
    ///
    /// # Errors
    ///
    /// An error aborts the route and is turned into an error response.
    fn after_full_route_invoked(&self, _cx: &mut HookContext, _body: &str) -> HookResult {
        Ok(())
    }

    /// Runs when routing failed, before the error is rendered.
    ///
    /// # Errors
    ///
    /// An error here is not recovered: it propagates out of the dispatcher.
    fn error_occurred(&self, _cx: &mut HookContext, _error: &RouteError) -> HookResult {
        Ok(())
    }
}
