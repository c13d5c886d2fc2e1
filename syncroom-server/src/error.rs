use thiserror::Error;

/// Startup-time failures. Per-message failures are never errors: malformed
/// payloads and missing delivery targets are logged and dropped, scoped to
/// a single message or connection.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address `{0}`")]
    InvalidAddr(String),

    #[error("invalid allowed origin `{0}`")]
    InvalidOrigin(String),
}
