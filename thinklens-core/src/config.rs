//! Configuration system for thinklens.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/thinklens/config.toml` and/or
//! `.thinklens/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::form::DEFAULT_MAX_TEXT_CHARS;
use crate::view::ElementIds;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThinklensConfig {
    pub client: ClientConfig,
    pub limits: LimitsConfig,
    pub page: PageConfig,
    pub mock_server: MockServerConfig,
}

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host and port of the service.
    pub base_url: String,
    /// Path of the analyze endpoint.
    pub analyze_path: String,
    /// Request timeout in seconds. Unset means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            analyze_path: "/api/analyze".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.analyze_path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                message: format!("client.base_url must be an http(s) URL, got '{}'", self.base_url),
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                message: "client.request_timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Client-side input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum text length in characters.
    pub max_text_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

/// Page contract and control labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub submit_label: String,
    pub busy_label: String,
    #[serde(default)]
    pub ids: ElementIds,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            submit_label: "Analyze".to_string(),
            busy_label: "Analyzing...".to_string(),
            ids: ElementIds::default(),
        }
    }
}

/// Bind address of the development mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `THINKLENS_`)
/// 3. Workspace-local config (`.thinklens/config.toml`)
/// 4. User config (`~/.config/thinklens/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ThinklensConfig>,
) -> Result<ThinklensConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(ThinklensConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "thinklens", "thinklens") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".thinklens").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // THINKLENS_CLIENT__BASE_URL, THINKLENS_LIMITS__MAX_TEXT_CHARS, etc.
    figment = figment.merge(Env::prefixed("THINKLENS_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Load an explicit config file on top of the defaults, skipping discovery.
pub fn load_config_file(path: &Path) -> Result<ThinklensConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Figment::from(Serialized::defaults(ThinklensConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("THINKLENS_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}

/// Render the effective configuration as TOML.
pub fn to_toml(config: &ThinklensConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}
