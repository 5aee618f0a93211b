// Declarative route tables for Waypoint
//
// Route files list routes in match order:
//
// [[routes]]
// methods = ["GET"]
// path = "/user/[:id]"
// target = "user.detail"
//
// [[routes.matchers.id]]
// type = "numeric"

pub mod definition;
pub mod error;
pub mod loader;

pub use definition::{MatcherDefinition, RouteConfig, RouteDefinition};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};

use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use waypoint_core::{PathRouter, Route, RouteBuilder};

/// Environment variable read by [`RouteConfig::from_env`] by default
pub const DEFAULT_ROUTES_VAR: &str = "WAYPOINT_ROUTES";

impl RouteConfig {
    /// Load a route file, detecting the format from its extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = ConfigLoader::auto(path)?.load_file(path)?;
        debug!(path = %path.display(), routes = config.routes.len(), "Loaded route file");
        Ok(config)
    }

    /// Load the route file named by an environment variable
    ///
    /// A `.env` file in the working directory is read first, if present.
    pub fn from_env(var: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        let path = env::var(var)?;
        Self::from_file(path)
    }

    /// Load the route file named by a variable of the given `.env` file
    ///
    /// The process environment is not modified. Falls back to the process
    /// environment if the file does not define the variable. A relative path
    /// is resolved against the directory of the `.env` file.
    pub fn from_dotenv(dotenv: impl AsRef<Path>, var: &str) -> Result<Self> {
        let dotenv = dotenv.as_ref();
        let entries = dotenvy::from_path_iter(dotenv)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", dotenv.display(), e)))?;

        let mut value = None;
        for entry in entries {
            let (key, val) = entry.map_err(|e| ConfigError::ParseError(e.to_string()))?;
            if key == var {
                value = Some(val);
            }
        }

        let path = match value {
            Some(value) => {
                let path = PathBuf::from(value);
                match dotenv.parent() {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                }
            }
            None => PathBuf::from(env::var(var)?),
        };

        Self::from_file(path)
    }

    /// Build all routes in declaration order
    pub fn build_routes(&self) -> Result<Vec<Route>> {
        self.build_with(&RouteBuilder::new())
    }

    /// Append all routes to a router, building them with the router's route
    /// factory
    pub fn apply_to(&self, router: &mut PathRouter) -> Result<()> {
        for (index, route) in self.build_with(&router.route())?.into_iter().enumerate() {
            let path = route.path().to_string();
            router
                .add_route(route)
                .map_err(|source| ConfigError::InvalidRoute {
                    index,
                    path,
                    source,
                })?;
        }

        info!(routes = self.routes.len(), "Route table configured");
        Ok(())
    }

    /// Build a new router holding all routes
    pub fn into_router(self) -> Result<PathRouter> {
        let mut router = PathRouter::new();
        self.apply_to(&mut router)?;
        Ok(router)
    }

    fn build_with(&self, builder: &RouteBuilder) -> Result<Vec<Route>> {
        self.routes
            .iter()
            .enumerate()
            .map(|(index, definition)| {
                definition
                    .to_route(builder)
                    .map_err(|source| ConfigError::InvalidRoute {
                        index,
                        path: definition.path.clone(),
                        source,
                    })
            })
            .collect()
    }
}
