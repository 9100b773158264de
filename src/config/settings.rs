//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the gateway.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration settings for the guest gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server configuration
    pub server: ServerSettings,
    /// Cookie harvest configuration
    pub harvest: HarvestSettings,
    /// Credential cache configuration
    pub cache: CacheSettings,
    /// Media relay configuration
    pub relay: RelaySettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Browser cookie harvest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    /// Origin the browser navigates to
    pub origin_url: String,
    /// Identification string presented by the browser context
    pub user_agent: String,
    /// Browser viewport width
    pub viewport_width: u32,
    /// Browser viewport height
    pub viewport_height: u32,
    /// Settle time after navigation, in seconds
    pub settle_seconds: u64,
    /// Maximum harvest attempts per acquisition
    pub max_attempts: u32,
    /// Cooldown between failed attempts, in seconds
    pub retry_cooldown_seconds: u64,
    /// CDP request timeout, in seconds
    pub navigation_timeout_seconds: u64,
    /// Run the browser headless
    pub headless: bool,
    /// Cookie names a validated credential set should carry
    pub required_cookies: Vec<String>,
}

/// Credential cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Credential TTL in seconds
    pub ttl_seconds: u64,
    /// Optional credential snapshot file used to seed the cache at startup
    pub store_path: Option<PathBuf>,
}

/// Media relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Referrer header presented to the protected origin
    pub referer: String,
    /// Identification string presented to the protected origin
    pub user_agent: String,
    /// Whole-request timeout for still-image fetches, in seconds
    pub image_timeout_seconds: u64,
    /// Upstream connect timeout, in seconds
    pub connect_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

/// Desktop Chrome identification string shared by harvest and relay defaults
const DESKTOP_CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "::".to_string(),
            port: 10000,
        }
    }
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            origin_url: "https://www.xiaohongshu.com".to_string(),
            user_agent: DESKTOP_CHROME_UA.to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
            settle_seconds: 5,
            max_attempts: 3,
            retry_cooldown_seconds: 3,
            navigation_timeout_seconds: 30,
            headless: true,
            required_cookies: vec!["webId".to_string(), "xsecappid".to_string()],
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            store_path: None,
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            referer: "https://www.xiaohongshu.com/".to_string(),
            user_agent: DESKTOP_CHROME_UA.to_string(),
            image_timeout_seconds: 10,
            connect_timeout_seconds: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl HarvestSettings {
    /// Settle wait as a [`Duration`]
    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_seconds)
    }

    /// Retry cooldown as a [`Duration`]
    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_secs(self.retry_cooldown_seconds)
    }

    /// Navigation timeout as a [`Duration`]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_seconds)
    }
}

impl RelaySettings {
    /// Image fetch timeout as a [`Duration`]
    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_seconds)
    }

    /// Connect timeout as a [`Duration`]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut settings = Self::default();

        // Load server settings from environment
        if let Ok(host) = std::env::var("XHS_SERVER_HOST") {
            settings.server.host = host;
        }

        if let Ok(port) = std::env::var("XHS_SERVER_PORT") {
            settings.server.port = port
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid port: {}", e)))?;
        }

        // Load cache settings from environment
        if let Ok(ttl) = std::env::var("XHS_CACHE_TTL") {
            settings.cache.ttl_seconds = ttl
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid TTL: {}", e)))?;
        }

        if let Ok(path) = std::env::var("XHS_COOKIE_STORE") {
            settings.cache.store_path = Some(PathBuf::from(path));
        }

        // Load harvest settings from environment
        if let Ok(origin) = std::env::var("XHS_ORIGIN_URL") {
            settings.harvest.origin_url = origin;
        }

        if let Ok(attempts) = std::env::var("XHS_HARVEST_ATTEMPTS") {
            settings.harvest.max_attempts = attempts
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid attempt count: {}", e)))?;
        }

        if let Ok(settle) = std::env::var("XHS_HARVEST_SETTLE") {
            settings.harvest.settle_seconds = settle
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid settle time: {}", e)))?;
        }

        Ok(settings)
    }

    /// Load settings from a TOML file; missing sections fall back to defaults
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&raw)
            .map_err(|e| crate::Error::Config(format!("Invalid config file: {}", e)))?;
        Ok(settings)
    }

    /// Validate the final configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.harvest.max_attempts == 0 {
            return Err(crate::Error::config("harvest.max_attempts must be at least 1"));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(crate::Error::config("cache.ttl_seconds must be positive"));
        }
        url::Url::parse(&self.harvest.origin_url)
            .map_err(|e| crate::Error::Config(format!("Invalid origin URL: {}", e)))?;
        Ok(())
    }

    /// Default credential snapshot location under the user cache directory
    pub fn default_store_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("xhs-guest-gateway").join("guest_cookies.json"))
    }
}
