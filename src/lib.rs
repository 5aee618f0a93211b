// Waypoint - request routing for Rust
//
// Matches requests against an ordered table of path templates and generates
// URIs for named routes.

// Re-export core functionality
pub use waypoint_core::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use waypoint_config;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Matcher, NumericMatcher, Params, PathRouter, PropertyRouter, RegexMatcher,
        RoutableRequest, Route, RouteBuilder, RouteError, RouteRequest, Router, RoutingFailure,
        RoutingResult, Target, ValueSetMatcher,
    };

    #[cfg(feature = "config")]
    pub use waypoint_config::{RouteConfig, RouteDefinition};
}
