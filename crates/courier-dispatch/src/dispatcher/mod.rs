//! Handler selection and the request lifecycle.
//!
//! ```text
//! START ─▶ SELECT_HANDLER ─┬─ none ─▶ FAIL
//!                          └─ found ─▶ after_handler_selected ─▶ perform_route
//!                                      ─▶ after_full_route_invoked ─▶ DONE
//! any state after selection ─▶ error_occurred ─▶ handle_exception ─▶ encode
//! ```
//!
//! Errors raised before a handler is chosen have no encoder to go through: in
//! request mode they become a bare-message response with the mapped status, in
//! command mode they are returned to the caller. The same bare-message form is
//! used when a handler's encoder cannot encode its error body.

use std::fmt;
use std::sync::Arc;

use courier_core::response::CONTENT_TYPE_HEADER;
use courier_core::{Container, ExecutionMode, Request, Response, RouteError, status};
use courier_plugins::{Hook, HookContext};
use tracing::{debug, warn};

use crate::handler::{Handler, RouteMatch};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Message of the error raised when no handler claims a request.
pub const NO_HANDLER_MESSAGE: &str = "no handler";

/// Routes requests to the first applicable handler.
pub struct Dispatcher {
    handlers: Vec<Box<dyn Handler>>,
    container: Arc<Container>,
}

impl Dispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub const fn new(container: Arc<Container>) -> Self {
        Self {
            handlers: Vec::new(),
            container,
        }
    }

    /// Appends a handler; handlers are consulted in insertion order.
    pub fn add_handler(&mut self, handler: Box<dyn Handler>) {
        self.handlers.push(handler);
    }

    /// Builder form of [`Dispatcher::add_handler`].
    #[must_use]
    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.add_handler(Box::new(handler));
        self
    }

    /// Registered handler names, in consultation order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Shared service container.
    #[must_use]
    pub const fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Finds the first handler of the request's mode that claims it.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::HandlerFailure`] with [`NO_HANDLER_MESSAGE`] when
    /// no handler matches.
    pub fn determine_handler(
        &self,
        request: &Request,
    ) -> Result<(&dyn Handler, RouteMatch), RouteError> {
        self.handlers
            .iter()
            .filter(|handler| handler.mode() == request.mode())
            .find_map(|handler| {
                let route = handler.is_appropriate(request)?;
                Some((handler.as_ref(), route))
            })
            .ok_or_else(|| RouteError::handler_failure(NO_HANDLER_MESSAGE))
    }

    /// Runs the full lifecycle for `request`.
    ///
    /// # Errors
    ///
    /// In command mode, returns the selection error when no handler matches.
    /// In both modes, returns errors raised by `error_occurred` hooks; every
    /// other failure becomes a response.
    pub fn handle(&self, request: &Request) -> Result<Response, RouteError> {
        let (handler, route) = match self.determine_handler(request) {
            Ok(found) => found,
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    mode = %request.mode(),
                    path = request.path(),
                    %error,
                    "request not claimed"
                );
                return match request.mode() {
                    ExecutionMode::Request => Ok(Response::unencoded_error(&error)),
                    ExecutionMode::Command => Err(error),
                };
            }
        };

        debug!(
            target: DISPATCH_TARGET,
            handler = handler.name(),
            unit = route.unit(),
            operation = route.operation(),
            "handler selected"
        );

        let mut cx = HookContext::new(handler.name(), Arc::clone(&self.container));
        cx.set_unit(route.unit());
        if let Some(operation) = route.operation() {
            cx.set_operation(operation);
        }

        match execute(handler, &route, &mut cx) {
            Ok(body) => Ok(respond(handler, body, status::OK, cx)),
            Err(error) => recover(handler, &error, cx),
        }
    }
}

fn execute(
    handler: &dyn Handler,
    route: &RouteMatch,
    cx: &mut HookContext,
) -> Result<String, RouteError> {
    handler.plugins().invoke(Hook::AfterHandlerSelected, cx)?;
    let body = handler.perform_route(route, cx)?;
    handler
        .plugins()
        .invoke(Hook::AfterFullRouteInvoked(&body), cx)?;
    Ok(body)
}

fn recover(
    handler: &dyn Handler,
    error: &RouteError,
    mut cx: HookContext,
) -> Result<Response, RouteError> {
    warn!(
        target: DISPATCH_TARGET,
        handler = handler.name(),
        status = error.status_code(),
        %error,
        "route failed"
    );
    handler
        .plugins()
        .invoke(Hook::ErrorOccurred(error), &mut cx)?;
    match handler.encoder().encode(&handler.handle_exception(error)) {
        Ok(body) => Ok(respond(handler, body, error.status_code(), cx).with_allow_header(error)),
        Err(encode_error) => {
            warn!(
                target: DISPATCH_TARGET,
                handler = handler.name(),
                error = %encode_error,
                "error body not encodable, sending bare message"
            );
            Ok(Response::unencoded_error(error))
        }
    }
}

fn respond(handler: &dyn Handler, body: String, status: u16, cx: HookContext) -> Response {
    Response::new(body, status)
        .with_headers(cx.into_headers())
        .with_header(CONTENT_TYPE_HEADER, handler.encoder().content_type())
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handler_names())
            .field("container", &self.container)
            .finish()
    }
}
