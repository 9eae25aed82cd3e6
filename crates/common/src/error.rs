use thiserror::Error;

/// Failure to assemble the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Failure to construct the messaging client at startup.
///
/// Every variant is fatal: retrying with the same credentials cannot succeed.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Messaging API unreachable: {0}")]
    Unreachable(String),

    #[error("Client error: {0}")]
    Client(String),
}

/// Startup errors surfaced by the binary before the polling loop runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Initialization error: {0}")]
    Init(#[from] InitError),

    #[error("Logging error: {0}")]
    Logging(#[from] std::io::Error),
}
