// Error types for route configuration and URI generation

use thiserror::Error;

/// Errors raised while configuring a route table or generating a URI.
///
/// A request that does not match any route is not an error; see
/// [`RoutingFailure`](crate::RoutingFailure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    // Configuration errors
    #[error("A route needs a non-empty path")]
    EmptyPath,

    #[error("A route needs a non-empty target")]
    EmptyTarget,

    #[error("A route needs to accept at least one method")]
    NoMethods,

    #[error("A route with a handler target needs to have a name defined (path: {0})")]
    UnnamedHandlerTarget(String),

    #[error("Invalid placeholder '{placeholder}' in path '{path}'")]
    InvalidPlaceholder { path: String, placeholder: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Invalid argument errors
    #[error("Please provide a route identifier, otherwise a URI cannot be generated")]
    MissingIdentifier,

    #[error("No route found for identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("Required parameters for '{identifier}' are missing: {}", .params.join(", "))]
    MissingParams {
        identifier: String,
        params: Vec<String>,
    },

    #[error("Value '{value}' for param '{param}' of '{identifier}' does not fulfill its matcher's criteria")]
    ParamMismatch {
        identifier: String,
        param: String,
        value: String,
    },
}

impl RouteError {
    /// Returns true for errors raised while a route or table is being set up.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RouteError::EmptyPath
                | RouteError::EmptyTarget
                | RouteError::NoMethods
                | RouteError::UnnamedHandlerTarget(_)
                | RouteError::InvalidPlaceholder { .. }
                | RouteError::InvalidPattern { .. }
        )
    }

    /// Returns true for errors caused by the arguments of a URI generation call.
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_configuration()
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
