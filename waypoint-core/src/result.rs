//! Routing results
//!
//! A match attempt either succeeds with a route and its extracted params, or
//! fails with one of three kinds that map directly onto HTTP status codes.

use crate::{Params, Route, Target};
use std::fmt;
use std::sync::Arc;

/// Why a match attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingFailure {
    /// No route matches the path
    NotFound,
    /// A route matches the path but does not accept the method
    MethodNotAllowed,
    /// A route matches path and method but a parameter fails its matchers
    BadRequest,
}

impl RoutingFailure {
    /// The HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            RoutingFailure::NotFound => 404,
            RoutingFailure::MethodNotAllowed => 405,
            RoutingFailure::BadRequest => 400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingFailure::NotFound => "not found",
            RoutingFailure::MethodNotAllowed => "method not allowed",
            RoutingFailure::BadRequest => "bad request",
        }
    }
}

impl fmt::Display for RoutingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one match attempt
#[derive(Debug, Clone)]
pub struct RoutingResult {
    route: Option<Arc<Route>>,
    params: Params,
    failure: Option<RoutingFailure>,
}

impl RoutingResult {
    /// A successful match of `route` with the extracted params
    pub fn success(route: Arc<Route>, params: Params) -> Self {
        Self {
            route: Some(route),
            params,
            failure: None,
        }
    }

    /// A failed match, optionally carrying the candidate route that caused it
    pub fn failure(failure: RoutingFailure, candidate: Option<Arc<Route>>) -> Self {
        Self {
            route: candidate,
            params: Params::new(),
            failure: Some(failure),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// The failure kind, `None` on success
    pub fn failure_kind(&self) -> Option<RoutingFailure> {
        self.failure
    }

    /// The matched route on success, the candidate route on failure
    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }

    /// Check whether the result refers to exactly this route instance
    pub fn is_route(&self, route: &Arc<Route>) -> bool {
        self.route.as_ref().is_some_and(|r| Arc::ptr_eq(r, route))
    }

    /// Extracted params; empty on failure
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Consume the result, returning the extracted params
    pub fn into_params(self) -> Params {
        self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params().get(name).map(String::as_str)
    }

    /// The target of the route carried by this result
    pub fn target(&self) -> Option<&Target> {
        self.route.as_ref().map(|r| r.target())
    }

    pub fn has_target(&self) -> bool {
        self.route.is_some()
    }

    pub fn has_handler_target(&self) -> bool {
        self.target().is_some_and(Target::is_handler)
    }

    /// The HTTP status code a caller should answer with on failure
    pub fn status_code(&self) -> Option<u16> {
        self.failure_kind().map(|f| f.status_code())
    }
}
