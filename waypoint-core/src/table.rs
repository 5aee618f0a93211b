//! The ordered route table
//!
//! Registration order is match precedence: the first route that matches by
//! path, method and matchers wins. Tables can be merged into each other; the
//! merged routes keep their relative order and are appended as they are.

use crate::{CompiledPattern, Params, Result, Route};
use std::slice::Iter;
use std::sync::Arc;
use tracing::{debug, warn};

/// A route together with its compiled path pattern
#[derive(Debug)]
pub struct CompiledRoute {
    pattern: CompiledPattern,
    route: Arc<Route>,
}

impl CompiledRoute {
    /// Compile the path template of a route
    pub fn compile(route: Arc<Route>) -> Result<Self> {
        let pattern = CompiledPattern::compile(route.path())?;
        Ok(Self { pattern, route })
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    /// Match the path pattern only, ignoring method and matchers
    pub fn captures(&self, path: &str) -> Option<Params> {
        self.pattern.captures(path)
    }
}

/// Ordered collection of compiled routes
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<CompiledRoute>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a route and append it to the table
    ///
    /// Returns the shared route instance that match results will refer to.
    pub fn register(&mut self, route: impl Into<Arc<Route>>) -> Result<Arc<Route>> {
        let compiled = CompiledRoute::compile(route.into())?;
        let route = compiled.route.clone();

        debug!(
            route = %route.identifier(),
            path = %route.path(),
            methods = ?route.methods(),
            "Registering route"
        );

        self.routes.push(Arc::new(compiled));
        Ok(route)
    }

    /// Append all compiled routes of another table
    ///
    /// Paths are taken over unchanged; no mount prefix is applied.
    pub fn extend(&mut self, other: &RouteTable) {
        warn!(
            routes = other.len(),
            "Merging route table without path prefix"
        );
        self.routes.extend(other.routes.iter().cloned());
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compiled routes in registration order
    pub fn iter(&self) -> Iter<'_, Arc<CompiledRoute>> {
        self.routes.iter()
    }

    /// The first route whose identifier equals `identifier`
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Arc<CompiledRoute>> {
        self.routes
            .iter()
            .find(|compiled| compiled.route.identifier() == identifier)
    }

    /// Methods of all routes whose pattern matches `path`, in registration
    /// order and without duplicates
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        let mut methods: Vec<String> = Vec::new();
        for compiled in self.routes.iter().filter(|c| c.pattern.is_match(path)) {
            for method in compiled.route.methods() {
                if !methods.contains(method) {
                    methods.push(method.clone());
                }
            }
        }
        methods
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Arc<CompiledRoute>;
    type IntoIter = Iter<'a, Arc<CompiledRoute>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An entry accepted by [`PathRouter::set_routes`](crate::PathRouter::set_routes)
#[derive(Debug, Clone)]
pub enum RouteEntry {
    /// A single route, compiled on registration
    Route(Arc<Route>),
    /// The routes of another table, merged verbatim
    Table(RouteTable),
}

impl From<Route> for RouteEntry {
    fn from(route: Route) -> Self {
        RouteEntry::Route(Arc::new(route))
    }
}

impl From<Arc<Route>> for RouteEntry {
    fn from(route: Arc<Route>) -> Self {
        RouteEntry::Route(route)
    }
}

impl From<RouteTable> for RouteEntry {
    fn from(table: RouteTable) -> Self {
        RouteEntry::Table(table)
    }
}
