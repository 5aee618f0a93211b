//! The inbound request abstraction
//!
//! Routers only need the method and the raw path of a request. Anything that
//! can provide both can be routed; implementations are included for
//! `http::Request` and for the plain [`RouteRequest`] value.

use crate::Params;

/// A request that can be routed
pub trait RoutableRequest {
    /// The request method, e.g. `GET`
    fn method(&self) -> &str;

    /// The request path, possibly followed by `?query`
    fn path(&self) -> &str;

    /// The raw query string without the leading `?`
    fn query(&self) -> Option<&str> {
        self.path().split_once('?').map(|(_, query)| query)
    }

    /// The form-decoded query parameters
    ///
    /// If a key repeats, the last value wins. A malformed query string
    /// yields no parameters.
    fn query_params(&self) -> Params {
        self.query()
            .map(|q| serde_urlencoded::from_str(q).unwrap_or_default())
            .unwrap_or_default()
    }
}

impl<B> RoutableRequest for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| self.uri().path())
    }

    fn query(&self) -> Option<&str> {
        self.uri().query()
    }
}

/// Minimal request value carrying just a method and a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub method: String,
    pub path: String,
}

impl RouteRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

impl RoutableRequest for RouteRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// Drop the query string of a raw path
pub(crate) fn strip_query(path: &str) -> &str {
    path.split_once('?').map(|(path, _)| path).unwrap_or(path)
}
