//! Configuration loading using Figment.
//!
//! Sources are merged in precedence order (later sources override earlier
//! ones):
//! 1. Default values
//! 2. A configuration file (`--config`, or `claude-hooks/config.toml` under
//!    the user config directory when it exists)
//! 3. Legacy `SLACK_*` environment variables
//! 4. `CLAUDE_HOOKS_*` environment variables
//!
//! The result is a plain [`HooksConfig`] value; nothing downstream reads the
//! environment directly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::error::{HooksError, HooksResult};

/// Prefix for environment variables read by the config loader.
pub const ENV_PREFIX: &str = "CLAUDE_HOOKS_";

/// Unprefixed variables kept for existing hook installations.
const LEGACY_ENV_VARS: [&str; 4] = [
    "SLACK_WEBHOOK_URL",
    "SLACK_MEMBER_ID",
    "SLACK_CHANNEL",
    "SLACK_TOKEN",
];

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Raw configuration as merged from all sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Incoming webhook URL notifications are posted to.
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_url: Option<String>,

    /// Bearer token sent in the `Authorization` header.
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,

    /// Slack member id mentioned in every notification.
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub member_id: Option<String>,

    /// Channel override for webhooks that allow it.
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub channel: Option<String>,

    /// Template for the plain-text fallback of each message.
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_template: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Accept any scalar as a string.
///
/// Figment parses environment values, so `SLACK_MEMBER_ID=1234` or a token
/// reading `true` arrives as a number or bool rather than a string.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Bool(bool),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Str(s) => s,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            token: None,
            member_id: None,
            channel: None,
            text_template: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HooksConfig {
    /// Resolve the webhook target.
    ///
    /// Fails with [`HooksError::MissingConfiguration`] when no URL is set, so
    /// callers can bail out before touching the network.
    pub fn target(&self) -> HooksResult<WebhookTarget> {
        let raw = non_blank(&self.webhook_url).ok_or_else(|| {
            HooksError::missing(format!(
                "no webhook URL configured; set SLACK_WEBHOOK_URL or {}WEBHOOK_URL",
                ENV_PREFIX
            ))
        })?;

        let url = Url::parse(raw).map_err(|e| HooksError::invalid("webhook_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HooksError::invalid(
                "webhook_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(HooksError::invalid("timeout_secs", "must be greater than zero"));
        }

        Ok(WebhookTarget {
            url,
            token: non_blank(&self.token).map(str::to_string),
            member_id: non_blank(&self.member_id).map(str::to_string),
            channel: non_blank(&self.channel).map(str::to_string),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A validated delivery destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    pub url: Url,
    pub token: Option<String>,
    pub member_id: Option<String>,
    pub channel: Option<String>,
    pub timeout: Duration,
}

impl WebhookTarget {
    /// Target with only a URL and the default timeout.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            member_id: None,
            channel: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Supported configuration file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from a path; unknown extensions are treated as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Default location of the user configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("claude-hooks").join("config.toml"))
}

/// Builds a [`HooksConfig`] from files and the environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    default_file: Option<PathBuf>,
    read_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_file: None,
            default_file: default_config_path(),
            read_env: true,
        }
    }

    /// Use `path` instead of the default config file. The file must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Override the optional default config file location.
    pub fn with_default_file(mut self, path: Option<PathBuf>) -> Self {
        self.default_file = path;
        self
    }

    /// Skip environment variables entirely.
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Load and extract the configuration.
    pub fn load(&self) -> HooksResult<HooksConfig> {
        let config = Self::extract(self.figment()?)?;
        debug!(
            webhook_configured = config.webhook_url.is_some(),
            timeout_secs = config.timeout_secs,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Extract a [`HooksConfig`] from an already-built figment.
    pub fn extract(figment: Figment) -> HooksResult<HooksConfig> {
        Ok(figment.extract::<HooksConfig>()?)
    }

    /// Build the figment with all sources in precedence order.
    pub fn figment(&self) -> HooksResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(HooksConfig::default()));

        if let Some(file) = self.config_file()? {
            trace!("Loading config file: {}", file.display());
            figment = figment.merge(Self::file_provider(&file));
        }

        if self.read_env {
            figment = figment
                .merge(
                    Env::raw()
                        .only(&LEGACY_ENV_VARS)
                        .map(|key| key.as_str().to_lowercase().replacen("slack_", "", 1).into()),
                )
                .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()));
        }

        Ok(figment)
    }

    fn config_file(&self) -> HooksResult<Option<PathBuf>> {
        if let Some(path) = &self.explicit_file {
            if !path.is_file() {
                return Err(HooksError::invalid(
                    "config",
                    format!("configuration file not found: {}", path.display()),
                ));
            }
            return Ok(Some(path.clone()));
        }
        Ok(self.default_file.clone().filter(|p| p.is_file()))
    }

    fn file_provider(path: &Path) -> Figment {
        match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        }
    }
}
