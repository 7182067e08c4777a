//! Server configuration.
//!
//! The port and web root always come from the command line. Everything
//! else may be given in an optional YAML file and is then overridden by
//! command-line flags. Once the listener starts, the configuration is frozen
//! and shared read-only with every connection.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   backlog: 10
//! site:
//!   default_document: index.html
//!   chunk_size: 8192
//! ```
//!
//! Unknown keys, including `port` and `web_root`, are rejected.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BACKLOG: u32 = 10;
pub const DEFAULT_DOCUMENT: &str = "index.html";
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
}

/// Where and how to listen.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    #[serde(skip, default = "default_port")]
    pub port: u16,
    /// Pending-connection queue length passed to `listen`
    pub backlog: u32,
}

/// What to serve. Shared by every connection task.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    #[serde(skip, default = "default_web_root")]
    pub web_root: PathBuf,
    /// Served in place of the target `/`
    pub default_document: String,
    /// Largest read/write unit when streaming a file
    pub chunk_size: usize,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_web_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: default_port(),
            backlog: DEFAULT_BACKLOG,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            web_root: default_web_root(),
            default_document: DEFAULT_DOCUMENT.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ServerConfig {
    /// `host:port` as passed to the resolver.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SiteConfig {
    pub fn new(web_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
            ..Self::default()
        }
    }
}

impl Config {
    /// Builds a configuration for `port` and `web_root`, everything else default.
    pub fn new(port: u16, web_root: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig {
                port,
                ..ServerConfig::default()
            },
            site: SiteConfig::new(web_root),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks values that would make the server unusable.
    ///
    /// Does not touch the filesystem; see [`Config::check_web_root`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.backlog == 0 {
            return Err(ConfigError::Invalid("backlog must be >= 1".to_string()));
        }
        if self.site.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk size must be >= 1".to_string()));
        }
        let doc = &self.site.default_document;
        if doc.is_empty() || doc.contains('/') || doc == ".." {
            return Err(ConfigError::Invalid(format!(
                "default document must be a plain file name, got {:?}",
                doc
            )));
        }
        Ok(())
    }

    /// Fails unless the web root is an existing directory.
    pub fn check_web_root(&self) -> Result<(), ConfigError> {
        let root = &self.site.web_root;
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ConfigError::Invalid(format!(
                "web root {} is not a directory",
                root.display()
            ))),
            Err(source) => Err(ConfigError::Read {
                path: root.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.backlog, 10);
        assert_eq!(cfg.site.default_document, "index.html");
        assert_eq!(cfg.site.chunk_size, 8192);
    }

    #[test]
    fn test_address() {
        let cfg = Config::new(3000, "/srv/www");
        assert_eq!(cfg.server.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_default_document_with_slash() {
        let mut cfg = Config::default();
        cfg.site.default_document = "sub/index.html".to_string();
        assert!(cfg.validate().is_err());
    }
}
