//! HTTP-style status codes reported by the dispatcher.

/// Request completed successfully.
pub const OK: u16 = 200;
/// Input was rejected before reaching an operation.
pub const BAD_REQUEST: u16 = 400;
/// Caller is not authenticated.
pub const UNAUTHORIZED: u16 = 401;
/// Caller is authenticated but not permitted.
pub const FORBIDDEN: u16 = 403;
/// Target unit or operation does not exist.
pub const NOT_FOUND: u16 = 404;
/// Verb is not accepted by the target.
pub const METHOD_NOT_ALLOWED: u16 = 405;
/// Caller exceeded a rate limit.
pub const TOO_MANY_REQUESTS: u16 = 429;
/// Unclassified failure.
pub const INTERNAL_SERVER_ERROR: u16 = 500;
/// A dependency is temporarily unavailable.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Status used when an error carries no more specific classification.
pub const DEFAULT_ERROR: u16 = INTERNAL_SERVER_ERROR;
