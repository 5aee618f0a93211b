// Error types for route configuration files

use thiserror::Error;
use waypoint_core::RouteError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid route #{index} ({path}): {source}")]
    InvalidRoute {
        index: usize,
        path: String,
        #[source]
        source: RouteError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvError(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
