use crate::logging::LogFormat;

/// Default tracing filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Prefix shared by every configuration environment variable, for example
/// `COURIER_LOG_FILTER` or `COURIER_CONFIG_PATH`.
pub const ENV_PREFIX: &str = "COURIER";

/// Command-line flag naming the configuration file layer.
pub const CONFIG_PATH_FLAG: &str = "--config-path";

/// Default tracing filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value for serde defaults.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
