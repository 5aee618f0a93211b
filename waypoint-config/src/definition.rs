// Serializable route definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use waypoint_core::{
    ConstantSetMatcher, Matcher, NumericMatcher, RegexMatcher, Route, RouteBuilder,
    ValueSetMatcher,
};

/// A matcher as written in a route file
///
/// ```toml
/// [[routes.matchers.id]]
/// type = "numeric"
///
/// [[routes.matchers.status]]
/// type = "constants"
/// pattern = "STATUS_*"
/// constants = { STATUS_ACTIVE = "active", STATUS_BLOCKED = "blocked" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatcherDefinition {
    Regex {
        pattern: String,
    },
    Numeric,
    Values {
        values: Vec<String>,
    },
    Constants {
        pattern: String,
        constants: BTreeMap<String, String>,
    },
}

impl MatcherDefinition {
    /// Build the matcher
    ///
    /// Fails if a regex pattern does not compile.
    pub fn to_matcher(&self) -> waypoint_core::Result<Arc<dyn Matcher>> {
        let matcher: Arc<dyn Matcher> = match self {
            MatcherDefinition::Regex { pattern } => Arc::new(RegexMatcher::new(pattern.as_str())?),
            MatcherDefinition::Numeric => Arc::new(NumericMatcher::new()),
            MatcherDefinition::Values { values } => {
                Arc::new(ValueSetMatcher::new(values.iter().cloned()))
            }
            MatcherDefinition::Constants { pattern, constants } => {
                let constants = constants.iter().map(|(name, value)| (name, value.clone()));
                Arc::new(ConstantSetMatcher::new(constants, pattern))
            }
        };
        Ok(matcher)
    }
}

/// One route of a route file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub methods: Vec<String>,
    pub path: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Matchers keyed by parameter name, applied in the listed order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matchers: BTreeMap<String, Vec<MatcherDefinition>>,
}

impl RouteDefinition {
    /// Build the route on top of the given builder
    pub fn to_route(&self, builder: &RouteBuilder) -> waypoint_core::Result<Route> {
        let mut builder = builder.from(self.path.as_str()).to(self.target.as_str());
        for method in &self.methods {
            builder = builder.accepting(method);
        }
        if let Some(name) = &self.name {
            builder = builder.named(name.as_str());
        }
        for (param, matchers) in &self.matchers {
            for definition in matchers {
                builder = builder.if_matches_arc(param.as_str(), definition.to_matcher()?);
            }
        }

        builder.build()
    }
}

/// A complete route file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}
