// Core library for the Waypoint request router
// Path templates, matchers, route tables, request matching and URI generation

pub mod error;
pub mod logging;
pub mod matcher;
pub mod pattern;
pub mod property;
pub mod request;
pub mod result;
pub mod route;
pub mod router;
pub mod table;

// Re-export commonly used types
pub use error::*;
pub use matcher::*;
pub use pattern::{CompiledPattern, Params};
pub use property::PropertyRouter;
pub use request::{RoutableRequest, RouteRequest};
pub use result::*;
pub use route::*;
pub use router::{PathRouter, Router};
pub use table::{CompiledRoute, RouteEntry, RouteTable};
