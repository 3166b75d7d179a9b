use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A series as returned by TVDB search or lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: u32,
    pub name: String,
    pub year: u32,
    pub slug: String,
    pub aliases: Vec<String>,
}

/// One episode under a given ordering scheme.
///
/// `number` is specific to the ordering scheme the episode list was
/// fetched with; the same underlying episode can carry different numbers
/// under different orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub season: u32,
    pub number: u32,
    pub absolute: u32,
    pub title: String,
    pub air_date: Option<NaiveDate>,
    pub is_special: bool,
}

/// API client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub pin: String,
    pub timeout_secs: u64,
    pub rate_limit_backoff: std::time::Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api4.thetvdb.com/v4".to_string(),
            api_key: String::new(),
            pin: String::new(),
            timeout_secs: 20,
            rate_limit_backoff: std::time::Duration::from_secs(2),
        }
    }
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            pin: pin.into(),
            ..Default::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Errors that can occur when talking to TVDB
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("TVDB API key missing: set TVDB_APIKEY")]
    MissingApiKey,

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    #[error("Rate limited by TVDB")]
    RateLimited,

    #[error("{method} {path} failed: HTTP {status}: {message}")]
    Upstream {
        method: &'static str,
        path: String,
        status: u16,
        message: String,
    },

    #[error("Retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Map an ordering scheme to the canonical token the episodes endpoint
/// expects. Unrecognized values pass through verbatim.
pub fn normalize_order(order: &str) -> String {
    match order.trim().to_lowercase().as_str() {
        "" | "aired" | "default" => "default".to_string(),
        "dvd" => "dvd".to_string(),
        "absolute" | "abs" => "absolute".to_string(),
        "alternate" | "alt" => "alternate".to_string(),
        "regional" => "regional".to_string(),
        "alternate-dvd" | "alternate_dvd" | "altdvd" => "alternate-dvd".to_string(),
        _ => order.to_string(),
    }
}

/// Accept a numeric field transmitted as either a JSON number or a
/// numeric string, defaulting to 0 on anything unparseable.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_u32(&value))
}

fn coerce_u32(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0) as u32,
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

// ===== Wire types =====

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub data: LoginData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<SearchRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRecord {
    #[serde(default, rename = "tvdb_id", deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub year: u32,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl SearchRecord {
    pub fn into_series(self) -> Series {
        Series {
            id: self.id,
            name: self.name,
            year: self.year,
            slug: self.slug,
            aliases: self.aliases,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeriesResponse {
    pub data: SeriesRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeriesRecord {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub year: u32,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl SeriesRecord {
    pub fn into_series(self) -> Series {
        Series {
            id: self.id,
            name: self.name,
            year: self.year,
            slug: self.slug,
            aliases: self.aliases,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EpisodesResponse {
    pub data: EpisodesData,
    #[serde(default)]
    pub links: PageLinks,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EpisodesData {
    #[serde(default)]
    pub episodes: Vec<EpisodeRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageLinks {
    /// 0 or absent means "no further page"
    #[serde(default, deserialize_with = "lenient_u32")]
    pub next: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EpisodeRecord {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default, rename = "seasonNumber", deserialize_with = "lenient_u32")]
    pub season: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub number: u32,
    #[serde(default, rename = "absoluteNumber", deserialize_with = "lenient_u32")]
    pub absolute: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub aired: Option<String>,
}

impl EpisodeRecord {
    pub fn into_episode(self) -> Episode {
        let air_date = self
            .aired
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        Episode {
            id: self.id,
            season: self.season,
            number: self.number,
            absolute: self.absolute,
            title: self.name.unwrap_or_default(),
            air_date,
            is_special: self.season == 0,
        }
    }
}
