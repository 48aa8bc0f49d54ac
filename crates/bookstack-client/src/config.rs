//! # Client Configuration
//!
//! Configuration for the data access layer, read once at startup and
//! immutable for the process lifetime.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BOOKSTACK_SOURCE=static                                            │
//! │     BOOKSTACK_API_BASE_URL=http://localhost:4000                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bookstack/client.toml (Linux)                            │
//! │     ~/Library/Application Support/io.bookstack.client/client.toml (mac)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SourceMode::Live, http://localhost:4000                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [source]
//! mode = "live"  # live | static
//!
//! [api]
//! base_url = "http://localhost:4000"
//! timeout_secs = 30
//!
//! [snapshot]
//! root = "/var/lib/bookstack/data"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Source Mode
// =============================================================================

/// Which backend this client talks to.
///
/// Chosen once at startup and immutable thereafter: there is no runtime
/// switching between the two.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                        Source Mode Behavior                             │
/// │                                                                         │
/// │  LIVE (Default)                                                        │
/// │  ──────────────                                                        │
/// │  • Full REST semantics against a configured base URL                   │
/// │  • Reads and writes both allowed                                       │
/// │                                                                         │
/// │  STATIC                                                                │
/// │  ──────                                                                │
/// │  • Pre-rendered read-only JSON snapshots under a directory root        │
/// │  • Any write fails fast, before any I/O                                │
/// │  • Query parameters are silently dropped (snapshots are not            │
/// │    parameterized); callers filter client-side instead                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Writable remote REST API.
    #[default]
    Live,

    /// Read-only directory of pre-rendered per-resource snapshots.
    Static,
}

impl SourceMode {
    /// Returns true if this mode accepts write operations.
    pub fn is_writable(&self) -> bool {
        matches!(self, SourceMode::Live)
    }
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Live => write!(f, "live"),
            SourceMode::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for SourceMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "rest" | "api" => Ok(SourceMode::Live),
            "static" | "snapshot" => Ok(SourceMode::Static),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown source mode: '{}'. Valid options: live, static",
                other
            ))),
        }
    }
}

// =============================================================================
// API Settings (live mode)
// =============================================================================

/// Settings for the live REST backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the remote API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds). Applied at client construction; the
    /// transport defines no per-call timeout beyond this.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Snapshot Settings (static mode)
// =============================================================================

/// Settings for the static snapshot backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Directory holding one pre-rendered JSON file per resource
    /// (stores.json, books.json, authors.json, inventory.json).
    #[serde(default = "default_snapshot_root")]
    pub root: PathBuf,
}

fn default_snapshot_root() -> PathBuf {
    PathBuf::from("data")
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        SnapshotSettings {
            root: default_snapshot_root(),
        }
    }
}

// =============================================================================
// Source Selection
// =============================================================================

/// Wrapper table so the TOML reads `[source] mode = "live"`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default)]
    pub mode: SourceMode,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete data access configuration.
///
/// ## Example Config File
/// ```toml
/// [source]
/// mode = "live"
///
/// [api]
/// base_url = "http://localhost:4000"
/// timeout_secs = 30
///
/// [snapshot]
/// root = "/var/lib/bookstack/data"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend selection.
    #[serde(default)]
    pub source: SourceSettings,

    /// Live backend settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Static backend settings.
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

impl ClientConfig {
    /// Creates a config with defaults (live mode, localhost backend).
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.resolve_source();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        match self.source.mode {
            SourceMode::Live => {
                let url = Url::parse(&self.api.base_url)?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ClientError::InvalidUrl(format!(
                        "Base URL must start with http:// or https://, got: {}",
                        self.api.base_url
                    )));
                }
            }
            SourceMode::Static => {
                if self.snapshot.root.as_os_str().is_empty() {
                    return Err(ClientError::InvalidConfig(
                        "snapshot root must not be empty in static mode".into(),
                    ));
                }
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // Source mode
        if let Ok(mode) = std::env::var("BOOKSTACK_SOURCE") {
            match mode.parse() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding source mode from environment");
                    self.source.mode = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown source mode in environment"),
            }
        }

        // Base URL
        if let Ok(url) = std::env::var("BOOKSTACK_API_BASE_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        // Snapshot root
        if let Ok(root) = std::env::var("BOOKSTACK_SNAPSHOT_DIR") {
            debug!(root = %root, "Overriding snapshot root from environment");
            self.snapshot.root = PathBuf::from(root);
        }

        // Timeout
        if let Ok(timeout) = std::env::var("BOOKSTACK_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                self.api.timeout_secs = secs;
            }
        }
    }

    /// Downgrades to static mode when live mode has no base URL to talk
    /// to, so a half-configured process still starts read-only instead of
    /// failing every request.
    fn resolve_source(&mut self) {
        if self.source.mode == SourceMode::Live && self.api.base_url.trim().is_empty() {
            warn!("Missing API base URL. Falling back to static snapshots.");
            self.source.mode = SourceMode::Static;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "bookstack", "client").map(|dirs| {
            let config_dir = dirs.config_dir();
            config_dir.join("client.toml")
        })
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the source mode.
    pub fn mode(&self) -> SourceMode {
        self.source.mode
    }

    /// Returns true if the configured backend accepts writes.
    pub fn is_writable(&self) -> bool {
        self.source.mode.is_writable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_mode_parsing() {
        assert_eq!("live".parse::<SourceMode>().unwrap(), SourceMode::Live);
        assert_eq!("rest".parse::<SourceMode>().unwrap(), SourceMode::Live);
        assert_eq!("static".parse::<SourceMode>().unwrap(), SourceMode::Static);
        assert_eq!("SNAPSHOT".parse::<SourceMode>().unwrap(), SourceMode::Static);
        assert!("invalid".parse::<SourceMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.source.mode, SourceMode::Live);
        assert_eq!(config.api.base_url, "http://localhost:4000");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        // Non-HTTP scheme should fail in live mode.
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        // Valid HTTPS URL should pass.
        config.api.base_url = "https://api.example.com".to_string();
        assert!(config.validate().is_ok());

        // Zero timeout should fail.
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_base_url_falls_back_to_static() {
        let mut config = ClientConfig::default();
        config.api.base_url = "  ".to_string();

        config.resolve_source();
        assert_eq!(config.source.mode, SourceMode::Static);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClientConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[api]"));

        let parsed: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.source.mode, config.source.mode);
    }
}
