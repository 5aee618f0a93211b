//! Routes and the route builder
//!
//! A [`Route`] binds a set of HTTP methods and a path template to a target.
//! Routes are validated on construction and immutable afterwards; variants
//! are derived through [`RouteBuilder`], whose operations never modify the
//! builder they are called on.
//!
//! # Examples
//!
//! ```
//! use waypoint_core::{NumericMatcher, RouteBuilder};
//!
//! let base = RouteBuilder::new().get("/user/[:id]").if_matches("id", NumericMatcher::new());
//!
//! let detail = base.to("user.detail").build().unwrap();
//! let edit = base.accepting("POST").to("user.edit").build().unwrap();
//!
//! assert_eq!(detail.methods(), &["GET"]);
//! assert_eq!(edit.methods(), &["GET", "POST"]);
//! ```

use crate::{Matcher, Matchers, Result, RouteError};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The thing a matched route resolves to
#[derive(Clone)]
pub enum Target {
    /// Plain identifier, e.g. an action name
    Identifier(String),
    /// Opaque handler object; routes with this target need a name
    Handler(Arc<dyn Any + Send + Sync>),
}

impl Target {
    /// Wrap an arbitrary handler value
    pub fn handler<T: Any + Send + Sync>(handler: T) -> Self {
        Target::Handler(Arc::new(handler))
    }

    /// The identifier, if this is a plain identifier target
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Target::Identifier(id) => Some(id),
            Target::Handler(_) => None,
        }
    }

    /// Returns true for handler targets
    pub fn is_handler(&self) -> bool {
        matches!(self, Target::Handler(_))
    }

    /// Downcast a handler target to its concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Target::Handler(handler) => handler.downcast_ref::<T>(),
            Target::Identifier(_) => None,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Target::Identifier(id) if id.trim().is_empty())
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Identifier(id) => f.debug_tuple("Identifier").field(id).finish(),
            Target::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::Identifier(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::Identifier(id)
    }
}

/// Normalize an HTTP method (trimmed, uppercase)
pub fn normalize_method(method: &str) -> String {
    method.trim().to_uppercase()
}

/// The raw parts of a route, as collected by a [`RouteBuilder`]
#[derive(Clone, Default)]
pub struct RouteParts {
    pub methods: Vec<String>,
    pub path: Option<String>,
    pub target: Option<Target>,
    pub name: Option<String>,
    pub matchers: HashMap<String, Matchers>,
}

/// Immutable route definition
#[derive(Clone)]
pub struct Route {
    methods: Vec<String>,
    path: String,
    target: Target,
    name: Option<String>,
    matchers: HashMap<String, Matchers>,
}

impl Route {
    /// Create a route without matchers or name
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_core::Route;
    ///
    /// let route = Route::new(["get", " post "], "/users", "user.list").unwrap();
    /// assert_eq!(route.methods(), &["GET", "POST"]);
    /// assert_eq!(route.identifier(), "user.list");
    /// ```
    pub fn new<I, S>(methods: I, path: impl Into<String>, target: impl Into<Target>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_parts(RouteParts {
            methods: methods.into_iter().map(|m| m.as_ref().to_string()).collect(),
            path: Some(path.into()),
            target: Some(target.into()),
            name: None,
            matchers: HashMap::new(),
        })
    }

    /// Validate the given parts and build a route from them
    pub fn from_parts(parts: RouteParts) -> Result<Self> {
        let path = parts
            .path
            .filter(|p| !p.trim().is_empty())
            .ok_or(RouteError::EmptyPath)?;

        let target = parts
            .target
            .filter(|t| !t.is_empty())
            .ok_or(RouteError::EmptyTarget)?;

        let mut methods: Vec<String> = Vec::with_capacity(parts.methods.len());
        for method in parts.methods.iter().map(|m| normalize_method(m)) {
            if !method.is_empty() && !methods.contains(&method) {
                methods.push(method);
            }
        }
        if methods.is_empty() {
            return Err(RouteError::NoMethods);
        }

        let name = parts.name.filter(|n| !n.is_empty());
        if target.is_handler() && name.is_none() {
            return Err(RouteError::UnnamedHandlerTarget(path));
        }

        Ok(Self {
            methods,
            path,
            target,
            name,
            matchers: parts.matchers,
        })
    }

    /// Start a new builder using the default route factory
    pub fn builder() -> RouteBuilder {
        RouteBuilder::new()
    }

    /// Derive a builder carrying this route's configuration
    pub fn to_builder(&self) -> RouteBuilder {
        RouteBuilder {
            factory: Arc::new(DefaultRouteFactory),
            parts: RouteParts {
                methods: self.methods.clone(),
                path: Some(self.path.clone()),
                target: Some(self.target.clone()),
                name: self.name.clone(),
                matchers: self.matchers.clone(),
            },
        }
    }

    /// Accepted methods (normalized, in declaration order)
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Check whether the route accepts the given method
    pub fn accepts(&self, method: &str) -> bool {
        let method = normalize_method(method);
        self.methods.iter().any(|m| *m == method)
    }

    /// The path template, e.g. `/user/[:id]`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// All matchers, keyed by parameter name
    pub fn matchers(&self) -> &HashMap<String, Matchers> {
        &self.matchers
    }

    /// Matchers declared for one parameter (empty if none)
    pub fn matchers_for(&self, param: &str) -> &[Arc<dyn Matcher>] {
        self.matchers.get(param).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The identifier used for URI generation: the name if set, otherwise
    /// the identifier target.
    pub fn identifier(&self) -> &str {
        match (&self.name, &self.target) {
            (Some(name), _) => name,
            (None, Target::Identifier(id)) => id,
            // rejected in from_parts
            (None, Target::Handler(_)) => "",
        }
    }

    /// Check a value against every matcher of a parameter, returning the
    /// description of the first matcher that rejects it.
    pub(crate) fn first_rejection(&self, param: &str, value: &str) -> Option<String> {
        self.matchers_for(param)
            .iter()
            .find(|matcher| !matcher.matches(value))
            .map(|matcher| matcher.description())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut matcher_params: Vec<&String> = self.matchers.keys().collect();
        matcher_params.sort();
        f.debug_struct("Route")
            .field("methods", &self.methods)
            .field("path", &self.path)
            .field("target", &self.target)
            .field("name", &self.name)
            .field("matchers", &matcher_params)
            .finish()
    }
}

/// Strategy used by [`RouteBuilder::build`] to turn collected parts into a route
pub trait RouteFactory: Send + Sync {
    fn create(&self, parts: RouteParts) -> Result<Route>;
}

/// The canonical factory: validates the parts with [`Route::from_parts`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRouteFactory;

impl RouteFactory for DefaultRouteFactory {
    fn create(&self, parts: RouteParts) -> Result<Route> {
        Route::from_parts(parts)
    }
}

/// Copy-on-write route builder
///
/// Every operation borrows the builder and returns a modified copy, so a
/// partially configured builder can be shared as a template.
#[derive(Clone)]
pub struct RouteBuilder {
    factory: Arc<dyn RouteFactory>,
    parts: RouteParts,
}

impl RouteBuilder {
    /// Create an empty builder using the default route factory
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultRouteFactory))
    }

    /// Create an empty builder using the given factory
    pub fn with_factory(factory: Arc<dyn RouteFactory>) -> Self {
        Self {
            factory,
            parts: RouteParts::default(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut RouteParts)) -> Self {
        let mut next = self.clone();
        f(&mut next.parts);
        next
    }

    /// Build the route through the builder's factory
    pub fn build(&self) -> Result<Route> {
        self.factory.create(self.parts.clone())
    }

    /// The parts collected so far
    pub fn parts(&self) -> &RouteParts {
        &self.parts
    }

    pub fn get(&self, path: impl Into<String>) -> Self {
        self.from(path).accepting("GET")
    }

    pub fn post(&self, path: impl Into<String>) -> Self {
        self.from(path).accepting("POST")
    }

    pub fn put(&self, path: impl Into<String>) -> Self {
        self.from(path).accepting("PUT")
    }

    pub fn patch(&self, path: impl Into<String>) -> Self {
        self.from(path).accepting("PATCH")
    }

    pub fn delete(&self, path: impl Into<String>) -> Self {
        self.from(path).accepting("DELETE")
    }

    pub fn head(&self, path: impl Into<String>) -> Self {
        self.from(path).accepting("HEAD")
    }

    pub fn options(&self, path: impl Into<String>) -> Self {
        self.from(path).accepting("OPTIONS")
    }

    /// Add a method the route should accept
    pub fn accepting(&self, method: &str) -> Self {
        let method = normalize_method(method);
        self.update(|parts| {
            if !parts.methods.contains(&method) {
                parts.methods.push(method);
            }
        })
    }

    /// Remove a method from the accepted set
    pub fn refusing(&self, method: &str) -> Self {
        let method = normalize_method(method);
        self.update(|parts| parts.methods.retain(|m| *m != method))
    }

    /// Append a matcher the given parameter has to fulfill
    pub fn if_matches(&self, param: impl Into<String>, matcher: impl Matcher + 'static) -> Self {
        self.if_matches_arc(param, Arc::new(matcher))
    }

    /// Append an already shared matcher
    pub fn if_matches_arc(&self, param: impl Into<String>, matcher: Arc<dyn Matcher>) -> Self {
        let param = param.into();
        self.update(|parts| parts.matchers.entry(param).or_default().push(matcher))
    }

    /// Remove all matchers of the given parameter
    pub fn whatever_matches(&self, param: &str) -> Self {
        self.update(|parts| {
            parts.matchers.remove(param);
        })
    }

    /// Set the path template
    pub fn from(&self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.update(|parts| parts.path = Some(path))
    }

    /// Set the target
    pub fn to(&self, target: impl Into<Target>) -> Self {
        let target = target.into();
        self.update(|parts| parts.target = Some(target))
    }

    /// Set a handler target; the route also needs a name
    pub fn to_handler<T: Any + Send + Sync>(&self, handler: T) -> Self {
        self.to(Target::handler(handler))
    }

    pub fn named(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|parts| parts.name = Some(name))
    }

    pub fn no_name(&self) -> Self {
        self.update(|parts| parts.name = None)
    }
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}
