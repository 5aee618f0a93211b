//! Path template compilation
//!
//! Templates use `[:name]` placeholders. Each placeholder stands for one
//! non-empty path segment and is compiled into a named, non-greedy capture
//! group; literal text is matched verbatim. The compiled pattern is
//! case-insensitive, fully anchored and tolerates one trailing slash.
//!
//! ```
//! use waypoint_core::CompiledPattern;
//!
//! let pattern = CompiledPattern::compile("/user/[:id]").unwrap();
//! assert_eq!(pattern.regex_str(), "(?i)^/user/(?P<id>[^/]+?)/?$");
//!
//! let params = pattern.captures("/USER/42/").unwrap();
//! assert_eq!(params.get("id").map(String::as_str), Some("42"));
//! ```

use crate::{Result, RouteError};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;

/// Parameters extracted from (or substituted into) a path
pub type Params = HashMap<String, String>;

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A compiled path template
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    segments: Vec<Segment>,
    placeholders: Vec<String>,
    regex: Regex,
}

impl CompiledPattern {
    /// Compile a path template
    ///
    /// Fails with a configuration error when a placeholder name is not a
    /// valid identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    pub fn compile(template: &str) -> Result<Self> {
        let segments = parse_template(template)?;

        let mut expression = String::from("(?i)^");
        let mut placeholders = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Literal(text) => expression.push_str(&regex::escape(text)),
                Segment::Placeholder(name) => {
                    expression.push_str(&format!("(?P<{}>[^/]+?)", name));
                    placeholders.push(name.clone());
                }
            }
        }
        if !template.ends_with('/') {
            expression.push_str("/?");
        }
        expression.push('$');

        let regex = Regex::new(&expression).map_err(|e| RouteError::InvalidPattern {
            pattern: template.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            template: template.to_string(),
            segments,
            placeholders,
            regex,
        })
    }

    /// The template this pattern was compiled from
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The generated regular expression
    pub fn regex_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Placeholder names in template order
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match a path and extract the URL-decoded placeholder values
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;

        let params = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_string(), decode(m.as_str()).into_owned()))
            })
            .collect();

        Some(params)
    }

    /// Replace placeholders with URL-encoded values
    ///
    /// Placeholders without a value are left untouched and values without a
    /// placeholder are ignored.
    pub fn substitute(&self, params: &Params) -> String {
        let mut path = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(name) => match params.get(name) {
                    Some(value) => path.push_str(&urlencoding::encode(value)),
                    None => {
                        path.push_str("[:");
                        path.push_str(name);
                        path.push(']');
                    }
                },
            }
        }
        path
    }
}

/// Split a template into literal text and `[:name]` placeholders
fn parse_template(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("[:") {
        let Some(len) = rest[start + 2..].find(']') else {
            break;
        };
        let name = &rest[start + 2..start + 2 + len];
        if !is_valid_name(name) {
            return Err(RouteError::InvalidPlaceholder {
                path: template.to_string(),
                placeholder: name.to_string(),
            });
        }

        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_string()));
        }
        segments.push(Segment::Placeholder(name.to_string()));
        rest = &rest[start + 2 + len + 1..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }

    Ok(segments)
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// URL-decode a captured value, replacing invalid UTF-8 sequences
fn decode(value: &str) -> Cow<'_, str> {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded,
        Err(_) => {
            let bytes = urlencoding::decode_binary(value.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
