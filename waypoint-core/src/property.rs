//! Query parameter based routing
//!
//! [`PropertyRouter`] ignores the request path. The target is read from a
//! listener query parameter (`action` unless configured otherwise), e.g.
//! `/index?action=user.list&page=2`.

use crate::request::strip_query;
use crate::{Params, Result, RoutableRequest, Route, RouteError, Router, RoutingFailure, RoutingResult};
use std::sync::Arc;
use tracing::debug;

/// Router reading the target from a query parameter
#[derive(Debug, Clone)]
pub struct PropertyRouter {
    base_url: String,
    listener: String,
    default_target: Option<String>,
    special_char_encoding: bool,
}

impl PropertyRouter {
    /// Create a router generating links below `base_url`
    ///
    /// A trailing slash is appended to the base URL if it is missing.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: format!("{}/", base_url.as_ref().trim_end_matches('/')),
            listener: "action".to_string(),
            default_target: None,
            special_char_encoding: false,
        }
    }

    /// Set the query parameter holding the target
    pub fn with_listener(mut self, listener: impl Into<String>) -> Self {
        self.listener = listener.into();
        self
    }

    /// Set the target used when a request does not name one
    pub fn with_default_target(mut self, target: impl Into<String>) -> Self {
        self.default_target = Some(target.into());
        self
    }

    /// HTML-escape the parameter part of generated links
    pub fn with_special_char_encoding(mut self, enabled: bool) -> Self {
        self.special_char_encoding = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn listener(&self) -> &str {
        &self.listener
    }

    pub fn default_target(&self) -> Option<&str> {
        self.default_target.as_deref()
    }

    pub fn special_char_encoding(&self) -> bool {
        self.special_char_encoding
    }
}

impl Router for PropertyRouter {
    /// Resolve the target of a request
    ///
    /// The matched route accepts the request's method and path and points to
    /// the target; all other query parameters become its params.
    fn match_request(&self, request: &dyn RoutableRequest) -> RoutingResult {
        let mut params = request.query_params();
        let target = params
            .remove(&self.listener)
            .filter(|t| !t.is_empty())
            .or_else(|| self.default_target.clone());

        let Some(target) = target else {
            debug!(listener = %self.listener, "No target found in request");
            return RoutingResult::failure(RoutingFailure::NotFound, None);
        };

        let path = match strip_query(request.path()) {
            "" => "/",
            path => path,
        };

        match Route::new([request.method()], path, target.as_str()) {
            Ok(route) => {
                debug!(route = %target, "Target resolved from request");
                RoutingResult::success(Arc::new(route), params)
            }
            Err(e) => {
                debug!(route = %target, error = %e, "Unable to build route for request");
                RoutingResult::failure(RoutingFailure::NotFound, None)
            }
        }
    }

    /// Build a link `<base>/?<listener>=<target>&<params>`
    ///
    /// Params are URL-encoded and ordered by name.
    fn generate_uri(&self, identifier: &str, params: &Params) -> Result<String> {
        if identifier.is_empty() {
            return Err(RouteError::MissingIdentifier);
        }

        let mut uri = format!(
            "{}?{}={}",
            self.base_url,
            urlencoding::encode(&self.listener),
            urlencoding::encode(identifier)
        );

        let mut pairs: Vec<(&String, &String)> = params.iter().collect();
        pairs.sort();

        let mut query = String::new();
        for (name, value) in pairs {
            query.push('&');
            query.push_str(&urlencoding::encode(name));
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }

        if self.special_char_encoding {
            query = escape_html(&query);
        }
        uri.push_str(&query);

        Ok(uri)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
