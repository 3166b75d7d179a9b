use crate::api::CacheTtls;
use crate::rename::{FormatOptions, MultiEpisodeMode, NamingScheme};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine home directory; set TVRN_HOME")]
    NoHomeDirectory,

    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Resolved settings for a run: environment first, CLI flags on top.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub pin: String,
    /// State root, holds the response cache
    pub home: PathBuf,
    pub scheme: NamingScheme,
    pub pad: usize,
    pub order: String,
    pub multi: MultiEpisodeMode,
    pub lang: String,
    /// Require the full word "yes" at the confirmation prompt
    pub strict_confirm: bool,
    pub ttls: CacheTtls,
}

impl Config {
    /// Build from the environment. `.env` files have already been
    /// loaded by the time this runs.
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = match env::var("TVRN_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .map(|h| h.join(".tvrn"))
                .ok_or(ConfigError::NoHomeDirectory)?,
        };

        let pad = match env::var("TVRN_PAD") {
            Ok(raw) if !raw.is_empty() => {
                raw.parse().map_err(|_| ConfigError::InvalidValue {
                    var: "TVRN_PAD",
                    value: raw,
                })?
            }
            _ => 2,
        };

        let config = Config {
            api_key: env::var("TVDB_APIKEY").unwrap_or_default(),
            pin: env::var("TVDB_PIN").unwrap_or_default(),
            home,
            scheme: NamingScheme::parse(&env_or("TVRN_SCHEME", "")),
            pad,
            order: env_or("TVRN_ORDER", "aired"),
            multi: MultiEpisodeMode::parse(&env_or("TVRN_MULTI", "")),
            lang: env_or("TVRN_LANG", "en"),
            strict_confirm: true,
            ttls: CacheTtls::default(),
        };
        debug!(home = ?config.home, lang = %config.lang, order = %config.order, "Loaded configuration");
        Ok(config)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.home.join("cache")
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            scheme: self.scheme,
            pad: self.pad,
            multi: self.multi,
        }
    }
}

fn env_or(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
