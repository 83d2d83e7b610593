//! Server settings and configuration file discovery.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use formcheck::{load_config, Config, ConfigError};
use tracing::info;

pub const CONFIG_ENV: &str = "FORMCHECK_CONFIG";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body cap, applied to multipart uploads and exported reports.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// `<platform config dir>/formcheck/config.json`
/// - macOS: ~/Library/Application Support/formcheck/config.json
/// - Linux: ~/.config/formcheck/config.json
/// - Windows: %APPDATA%/formcheck/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("formcheck").join("config.json"))
}

/// An explicit path always wins; the platform default is used only if present.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| default_config_path().filter(|p| p.is_file()))
}

pub fn load_verifier_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match resolve_config_path(explicit) {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            load_config(&path)
        }
        None => {
            info!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}
