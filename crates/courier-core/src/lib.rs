//! Shared request model and error taxonomy for the Courier dispatch core.
//!
//! `courier-core` holds the types every other crate in the workspace speaks:
//! the inbound [`Request`] with its lazily-read [`Body`], the outbound
//! [`Response`], the [`RouteError`] taxonomy together with its status-code
//! mapping, call [`Params`], and the injected [`Container`] used by plugins to
//! reach cross-cutting services.
//!
//! Nothing here performs I/O beyond draining a request body once. The crate is
//! deliberately free of dispatch logic so plugins can depend on it without
//! pulling in the handler machinery.

pub mod container;
pub mod error;
pub mod request;
pub mod response;
pub mod status;

pub use self::container::Container;
pub use self::error::RouteError;
pub use self::request::{Body, ExecutionMode, Params, Request};
pub use self::response::{Headers, Response};
