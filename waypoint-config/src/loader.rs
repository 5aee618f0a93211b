// Route file loaders

use crate::{ConfigError, Result, RouteConfig};
use std::fs;
use std::path::Path;

/// Supported route file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Route file loader
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Load a route table from file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<RouteConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    /// Parse a route table from string
    pub fn parse(&self, content: &str) -> Result<RouteConfig> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e))),
        }
    }
}
