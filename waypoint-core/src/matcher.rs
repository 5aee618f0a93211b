//! Parameter matchers
//!
//! Matchers constrain the value of a single path parameter. A route only
//! matches a request when every matcher declared for an extracted parameter
//! accepts its (URL-decoded) value, and the URI generator applies the same
//! check to the values it substitutes.
//!
//! # Features
//!
//! - **Regex**: whole-string match against an expression
//! - **Numeric**: positive integers without a leading zero
//! - **Value set**: membership in a fixed list of values
//! - **Constant set**: value set built from named constants selected by a glob
//! - **Closures**: any `Fn(&str) -> bool` is a matcher
//!
//! # Examples
//!
//! ```
//! use waypoint_core::{Matcher, RegexMatcher, ValueSetMatcher};
//!
//! let slug = RegexMatcher::new("[a-z0-9-]+").unwrap();
//! assert!(slug.matches("hello-world"));
//! assert!(!slug.matches("Hello World"));
//!
//! let status = ValueSetMatcher::new(["active", "inactive"]);
//! assert!(status.matches("active"));
//! ```

use crate::{Result, RouteError};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A predicate over a single parameter value.
///
/// Implementations must be pure: the same value always yields the same answer.
pub trait Matcher: Send + Sync {
    /// Test the given value against the matcher's criteria
    fn matches(&self, value: &str) -> bool;

    /// Short description used in log messages
    fn description(&self) -> String {
        "custom matcher".to_string()
    }
}

impl<F> Matcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, value: &str) -> bool {
        self(value)
    }
}

/// Ordered list of matchers for one parameter
pub type Matchers = Vec<Arc<dyn Matcher>>;

/// Regex matcher - the whole value has to match the expression
#[derive(Clone)]
pub struct RegexMatcher {
    expression: String,
    regex: Regex,
}

impl RegexMatcher {
    /// Create a new regex matcher
    ///
    /// The expression is anchored on both ends, so `\d+` only accepts values
    /// consisting entirely of digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_core::{Matcher, RegexMatcher};
    ///
    /// let matcher = RegexMatcher::new(r"\d+").unwrap();
    /// assert!(matcher.matches("123"));
    /// assert!(!matcher.matches("123abc"));
    /// ```
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        let regex = Regex::new(&format!("^(?:{})$", expression)).map_err(|e| {
            RouteError::InvalidPattern {
                pattern: expression.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { expression, regex })
    }

    /// The expression as given on construction (without anchors)
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    fn description(&self) -> String {
        format!("regex /{}/", self.expression)
    }
}

impl fmt::Debug for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexMatcher")
            .field("expression", &self.expression)
            .finish()
    }
}

/// Numeric matcher - positive integers without a leading zero
#[derive(Debug, Clone)]
pub struct NumericMatcher {
    inner: RegexMatcher,
}

impl NumericMatcher {
    pub fn new() -> Self {
        Self {
            // the expression is a literal, compiling it cannot fail
            inner: RegexMatcher {
                expression: "[1-9][0-9]*".to_string(),
                regex: Regex::new("^(?:[1-9][0-9]*)$").expect("static numeric expression"),
            },
        }
    }
}

impl Default for NumericMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for NumericMatcher {
    fn matches(&self, value: &str) -> bool {
        self.inner.matches(value)
    }

    fn description(&self) -> String {
        "numeric".to_string()
    }
}

/// Value set matcher - the value has to be one of a fixed list
///
/// Comparison is exact string equality; `"01"` does not match an allowed `"1"`.
#[derive(Debug, Clone, Default)]
pub struct ValueSetMatcher {
    values: Vec<String>,
}

impl ValueSetMatcher {
    /// Create a new value set matcher
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_core::{Matcher, ValueSetMatcher};
    ///
    /// let matcher = ValueSetMatcher::new(["de", "en", "fr"]);
    /// assert!(matcher.matches("en"));
    /// assert!(!matcher.matches("EN"));
    /// ```
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The allowed values
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Matcher for ValueSetMatcher {
    fn matches(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    fn description(&self) -> String {
        format!("one of [{}]", self.values.join(", "))
    }
}

/// Constant set matcher - a value set made of named constants whose name
/// matches a glob pattern
///
/// The caller passes the constants explicitly as `(name, value)` pairs. In
/// the pattern `*` stands for any run of characters and `?` for exactly one.
#[derive(Debug, Clone)]
pub struct ConstantSetMatcher {
    pattern: String,
    inner: ValueSetMatcher,
}

impl ConstantSetMatcher {
    /// Create a new constant set matcher
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_core::{ConstantSetMatcher, Matcher};
    ///
    /// const STATUS: &[(&str, &str)] = &[
    ///     ("STATUS_ACTIVE", "active"),
    ///     ("STATUS_BLOCKED", "blocked"),
    ///     ("ROLE_ADMIN", "admin"),
    /// ];
    ///
    /// let matcher = ConstantSetMatcher::new(STATUS.iter().copied(), "STATUS_*");
    /// assert!(matcher.matches("active"));
    /// assert!(!matcher.matches("admin"));
    /// ```
    pub fn new<I, N, V>(constants: I, pattern: &str) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let name_regex = glob_to_regex(pattern);
        let values = constants
            .into_iter()
            .filter(|(name, _)| name_regex.is_match(name.as_ref()))
            .map(|(_, value)| value.into());

        Self {
            pattern: pattern.to_string(),
            inner: ValueSetMatcher::new(values),
        }
    }

    /// The values of all constants selected by the pattern
    pub fn values(&self) -> &[String] {
        self.inner.values()
    }
}

impl Matcher for ConstantSetMatcher {
    fn matches(&self, value: &str) -> bool {
        self.inner.matches(value)
    }

    fn description(&self) -> String {
        format!("constants '{}'", self.pattern)
    }
}

/// Translate a glob (`*`, `?`) into an anchored regex. Every other character
/// is matched literally.
fn glob_to_regex(pattern: &str) -> Regex {
    let mut expression = String::with_capacity(pattern.len() + 8);
    expression.push('^');
    for c in pattern.chars() {
        match c {
            '*' => expression.push_str(".*"),
            '?' => expression.push('.'),
            other => expression.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    expression.push('$');

    // only `.` and `.*` are unescaped, so the expression is always valid
    Regex::new(&expression).expect("escaped glob expression")
}
