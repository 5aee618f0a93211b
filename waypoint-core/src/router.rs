//! Request routing and URI generation
//!
//! [`PathRouter`] scans its route table in registration order. The first
//! route that matches by path, method and matchers wins. When no route
//! matches fully, the failure of the first route that matched by path is
//! reported (method not allowed or bad request); without any such candidate
//! the request is not found.
//!
//! # Examples
//!
//! ```
//! use waypoint_core::{PathRouter, RouteBuilder, RoutingFailure};
//!
//! let mut router = PathRouter::new();
//! router.add_route(RouteBuilder::new().get("/users").to("list").build().unwrap()).unwrap();
//! router.add_route(RouteBuilder::new().get("/user/[:id]").to("detail").build().unwrap()).unwrap();
//!
//! let result = router.match_path("GET", "/user/42");
//! assert_eq!(result.param("id"), Some("42"));
//!
//! let result = router.match_path("HEAD", "/users");
//! assert_eq!(result.failure_kind(), Some(RoutingFailure::MethodNotAllowed));
//!
//! assert_eq!(router.generate_uri("detail", [("id", 42)]).unwrap(), "/user/42");
//! ```

use crate::request::strip_query;
use crate::{
    DefaultRouteFactory, Params, Result, RoutableRequest, Route, RouteBuilder, RouteEntry,
    RouteError, RouteFactory, RouteTable, RoutingFailure, RoutingResult, normalize_method,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// The two operations a routing adapter needs
pub trait Router: Send + Sync {
    /// Match a request against the router's configuration
    fn match_request(&self, request: &dyn RoutableRequest) -> RoutingResult;

    /// Build the URI for the route or target with the given identifier
    fn generate_uri(&self, identifier: &str, params: &Params) -> Result<String>;
}

/// Router matching request paths against `[:name]` path templates
#[derive(Clone)]
pub struct PathRouter {
    table: RouteTable,
    factory: Arc<dyn RouteFactory>,
}

impl PathRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self {
            table: RouteTable::new(),
            factory: Arc::new(DefaultRouteFactory),
        }
    }

    /// Create a router holding the given routes and tables
    pub fn with_routes<I, E>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<RouteEntry>,
    {
        let mut router = Self::new();
        router.set_routes(entries)?;
        Ok(router)
    }

    /// Use a custom factory for builders handed out by [`PathRouter::route`]
    pub fn with_route_factory(mut self, factory: Arc<dyn RouteFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// A new route builder bound to this router's route factory
    pub fn route(&self) -> RouteBuilder {
        RouteBuilder::with_factory(self.factory.clone())
    }

    /// Compile and append a route
    ///
    /// Returns the shared instance that match results will refer to.
    pub fn add_route(&mut self, route: impl Into<Arc<Route>>) -> Result<Arc<Route>> {
        self.table.register(route)
    }

    /// Replace the whole table
    ///
    /// Nested tables are merged verbatim, their paths are not prefixed. On
    /// error the current table is kept unchanged.
    pub fn set_routes<I, E>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
        E: Into<RouteEntry>,
    {
        let mut table = RouteTable::new();
        for entry in entries {
            match entry.into() {
                RouteEntry::Route(route) => {
                    table.register(route)?;
                }
                RouteEntry::Table(other) => table.extend(&other),
            }
        }

        self.table = table;
        Ok(())
    }

    /// The compiled route table
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Match a method and a raw path (the query string is ignored)
    pub fn match_path(&self, method: &str, path: &str) -> RoutingResult {
        let path = strip_query(path);
        let method = normalize_method(method);

        debug!(path = %path, method = %method, "Analysing request path");

        let mut candidate: Option<(RoutingFailure, Arc<Route>)> = None;

        for compiled in self.table.iter() {
            let route = compiled.route();
            trace!(route = %route.identifier(), "Trying to match requested path to route");

            let Some(params) = compiled.captures(path) else {
                continue;
            };

            if !route.accepts(&method) {
                if candidate.is_none() {
                    candidate = Some((RoutingFailure::MethodNotAllowed, route.clone()));
                }
                continue;
            }

            if first_mismatch(route, &params).is_some() {
                if candidate.is_none() {
                    candidate = Some((RoutingFailure::BadRequest, route.clone()));
                }
                continue;
            }

            debug!(route = %route.identifier(), "Route matches");
            return RoutingResult::success(route.clone(), params);
        }

        match candidate {
            Some((failure, route)) => {
                debug!(
                    path = %path,
                    route = %route.identifier(),
                    failure = %failure,
                    "No matching route found"
                );
                RoutingResult::failure(failure, Some(route))
            }
            None => {
                debug!(path = %path, "No matching route found");
                RoutingResult::failure(RoutingFailure::NotFound, None)
            }
        }
    }

    /// Build the path of the first route with the given identifier
    ///
    /// Every placeholder of the route's template needs a value, and every
    /// given value has to pass the matchers declared for its parameter.
    /// Values are URL-encoded; values without a placeholder are ignored.
    pub fn generate_uri<I, K, V>(&self, identifier: &str, params: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        if identifier.is_empty() {
            return Err(RouteError::MissingIdentifier);
        }

        let compiled = self
            .table
            .find_by_identifier(identifier)
            .ok_or_else(|| RouteError::UnknownIdentifier(identifier.to_string()))?;

        let params: Params = params
            .into_iter()
            .map(|(name, value)| (name.into(), value.to_string()))
            .collect();

        let missing: Vec<String> = compiled
            .pattern()
            .placeholders()
            .iter()
            .filter(|name| !params.contains_key(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RouteError::MissingParams {
                identifier: identifier.to_string(),
                params: missing,
            });
        }

        if let Some((param, value)) = first_mismatch(compiled.route(), &params) {
            return Err(RouteError::ParamMismatch {
                identifier: identifier.to_string(),
                param: param.to_string(),
                value: value.to_string(),
            });
        }

        Ok(compiled.pattern().substitute(&params))
    }

    /// Methods accepted for a path, for an `Allow` header
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        self.table.allowed_methods(strip_query(path))
    }
}

impl Default for PathRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PathRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRouter")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl Router for PathRouter {
    fn match_request(&self, request: &dyn RoutableRequest) -> RoutingResult {
        self.match_path(request.method(), request.path())
    }

    fn generate_uri(&self, identifier: &str, params: &Params) -> Result<String> {
        PathRouter::generate_uri(self, identifier, params)
    }
}

/// Find the first param (in name order) whose value a matcher of the route
/// rejects
fn first_mismatch<'a>(route: &Route, params: &'a Params) -> Option<(&'a str, &'a str)> {
    let mut names: Vec<&String> = params.keys().collect();
    names.sort();

    for name in names {
        let value = &params[name];
        if let Some(matcher) = route.first_rejection(name, value) {
            debug!(
                route = %route.identifier(),
                param = %name,
                value = %value,
                matcher = %matcher,
                "Value did not match criteria of matcher"
            );
            return Some((name.as_str(), value.as_str()));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NumericMatcher, RouteRequest, ValueSetMatcher};

    fn router() -> PathRouter {
        PathRouter::with_routes([
            RouteBuilder::new().get("/users").to("list").build().unwrap(),
            RouteBuilder::new()
                .get("/user/[:id]")
                .to("detail")
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_match_success() {
        let router = router();
        let result = router.match_path("GET", "/user/42");
        assert!(result.succeeded());
        assert_eq!(result.target().and_then(|t| t.as_identifier()), Some("detail"));
        assert_eq!(result.param("id"), Some("42"));
        assert_eq!(result.params().len(), 1);
    }

    #[test]
    fn test_match_method_not_allowed() {
        let router = router();
        let result = router.match_path("HEAD", "/users");
        assert_eq!(result.failure_kind(), Some(RoutingFailure::MethodNotAllowed));
        assert_eq!(result.route().unwrap().identifier(), "list");
    }

    #[test]
    fn test_match_not_found() {
        let router = router();
        let result = router.match_path("GET", "/unknown");
        assert_eq!(result.failure_kind(), Some(RoutingFailure::NotFound));
        assert!(result.route().is_none());
    }

    #[test]
    fn test_match_normalizes_method() {
        let router = router();
        assert!(router.match_path(" get ", "/users").succeeded());
    }

    #[test]
    fn test_match_ignores_query_string() {
        let router = router();
        let result = router.match_path("GET", "/users?x=1");
        assert!(result.succeeded());
        assert_eq!(result.route().unwrap().identifier(), "list");
    }

    #[test]
    fn test_match_bad_request() {
        let mut router = PathRouter::new();
        let route = router
            .add_route(
                RouteBuilder::new()
                    .get("/user/[:id]")
                    .to("detail")
                    .if_matches("id", NumericMatcher::new())
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let result = router.match_path("GET", "/user/abc");
        assert_eq!(result.failure_kind(), Some(RoutingFailure::BadRequest));
        assert!(result.is_route(&route));
    }

    #[test]
    fn test_later_full_match_wins_over_candidate() {
        let mut router = PathRouter::new();
        router
            .add_route(RouteBuilder::new().post("/users").to("create").build().unwrap())
            .unwrap();
        let list = router
            .add_route(RouteBuilder::new().get("/users").to("list").build().unwrap())
            .unwrap();

        let result = router.match_path("GET", "/users");
        assert!(result.succeeded());
        assert!(result.is_route(&list));
    }

    #[test]
    fn test_first_candidate_is_kept() {
        let mut router = PathRouter::new();
        let strict = router
            .add_route(
                RouteBuilder::new()
                    .get("/item/[:id]")
                    .to("numeric")
                    .if_matches("id", NumericMatcher::new())
                    .build()
                    .unwrap(),
            )
            .unwrap();
        router
            .add_route(RouteBuilder::new().post("/item/[:id]").to("update").build().unwrap())
            .unwrap();

        let result = router.match_path("GET", "/item/abc");
        assert_eq!(result.failure_kind(), Some(RoutingFailure::BadRequest));
        assert!(result.is_route(&strict));

        let result = router.match_path("DELETE", "/item/abc");
        assert_eq!(result.failure_kind(), Some(RoutingFailure::MethodNotAllowed));
        assert!(result.is_route(&strict));
    }

    #[test]
    fn test_match_request() {
        let router = router();
        let result = router.match_request(&RouteRequest::new("GET", "/user/7?tab=posts"));
        assert_eq!(result.param("id"), Some("7"));

        let request = http::Request::builder()
            .method("GET")
            .uri("/users")
            .body(())
            .unwrap();
        assert!(router.match_request(&request).succeeded());
    }

    #[test]
    fn test_generate_uri() {
        let router = router();
        assert_eq!(router.generate_uri("detail", [("id", 42)]).unwrap(), "/user/42");
        assert_eq!(
            router.generate_uri("list", Vec::<(String, String)>::new()).unwrap(),
            "/users"
        );
    }

    #[test]
    fn test_generate_uri_missing_identifier() {
        let router = router();
        assert_eq!(
            router.generate_uri("", [("id", 1)]).unwrap_err(),
            RouteError::MissingIdentifier
        );
    }

    #[test]
    fn test_generate_uri_unknown_identifier() {
        let router = router();
        assert_eq!(
            router.generate_uri("nope", [("id", 1)]).unwrap_err(),
            RouteError::UnknownIdentifier("nope".to_string())
        );
    }

    #[test]
    fn test_generate_uri_missing_params() {
        let mut router = PathRouter::new();
        router
            .add_route(
                RouteBuilder::new()
                    .get("/[:lang]/post/[:slug]")
                    .to("post")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let err = router.generate_uri("post", [("other", "x")]).unwrap_err();
        assert_eq!(
            err,
            RouteError::MissingParams {
                identifier: "post".to_string(),
                params: vec!["lang".to_string(), "slug".to_string()],
            }
        );
    }

    #[test]
    fn test_generate_uri_param_mismatch() {
        let mut router = PathRouter::new();
        router
            .add_route(
                RouteBuilder::new()
                    .get("/[:lang]")
                    .to("home")
                    .if_matches("lang", ValueSetMatcher::new(["de", "en"]))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(router.generate_uri("home", [("lang", "en")]).unwrap(), "/en");
        let err = router.generate_uri("home", [("lang", "fr")]).unwrap_err();
        assert!(matches!(err, RouteError::ParamMismatch { ref param, .. } if param == "lang"));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_generate_uri_uses_name() {
        let mut router = PathRouter::new();
        router
            .add_route(
                RouteBuilder::new()
                    .get("/users")
                    .to_handler(|| "users")
                    .named("users")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(
            router.generate_uri("users", Vec::<(&str, &str)>::new()).unwrap(),
            "/users"
        );
    }

    #[test]
    fn test_trait_generate_uri() {
        let router: Box<dyn Router> = Box::new(router());
        let mut params = Params::new();
        params.insert("id".to_string(), "5".to_string());
        assert_eq!(router.generate_uri("detail", &params).unwrap(), "/user/5");
    }

    #[test]
    fn test_set_routes_replaces_table() {
        let mut router = router();
        router
            .set_routes([RouteBuilder::new().get("/other").to("other").build().unwrap()])
            .unwrap();

        assert_eq!(router.table().len(), 1);
        assert!(router.match_path("GET", "/users").failed());
    }

    #[test]
    fn test_set_routes_keeps_table_on_error() {
        let mut router = router();
        let result = router.set_routes([
            RouteBuilder::new().get("/ok").to("ok").build().unwrap(),
            RouteBuilder::new().get("/[:bad-name]").to("bad").build().unwrap(),
        ]);

        assert!(result.is_err());
        assert_eq!(router.table().len(), 2);
    }

    #[test]
    fn test_set_routes_merges_tables() {
        let nested = router();
        let mut router = PathRouter::new();
        router
            .set_routes([
                RouteEntry::from(RouteBuilder::new().get("/").to("home").build().unwrap()),
                RouteEntry::from(nested.table().clone()),
            ])
            .unwrap();

        assert_eq!(router.table().len(), 3);
        assert_eq!(router.match_path("GET", "/user/1").param("id"), Some("1"));
    }

    #[test]
    fn test_route_uses_factory() {
        struct Tagged;

        impl RouteFactory for Tagged {
            fn create(&self, mut parts: crate::RouteParts) -> Result<Route> {
                parts.name = Some("tagged".to_string());
                Route::from_parts(parts)
            }
        }

        let router = PathRouter::new().with_route_factory(Arc::new(Tagged));
        let route = router.route().get("/x").to("x").build().unwrap();
        assert_eq!(route.name(), Some("tagged"));
    }

    #[test]
    fn test_allowed_methods() {
        let mut router = router();
        router
            .add_route(RouteBuilder::new().post("/users").to("create").build().unwrap())
            .unwrap();
        assert_eq!(router.allowed_methods("/users?x=1"), vec!["GET", "POST"]);
    }
}
