use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_TOP_N: usize = 10;

/// Band bounds as shipped: percentage-scale literals compared against a raw
/// cosine score, so the band is never populated unless redefined.
pub const DEFAULT_BAND_MIN: f64 = 50.0;
pub const DEFAULT_BAND_MAX: f64 = 51.0;

/// all-MiniLM-L6-v2 output size
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

/// Half-open interval `[min, max)` over the raw similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for BandBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_BAND_MIN,
            max: DEFAULT_BAND_MAX,
        }
    }
}

impl BandBounds {
    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score < self.max
    }

    /// Whether any cosine score in [-1, 1] can land inside the band.
    pub fn is_reachable(&self) -> bool {
        self.min < self.max && self.min <= 1.0 && self.max > -1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedderKind {
    /// Offline feature hashing
    #[default]
    Hash,
    /// Remote text-embeddings server
    Http,
}

impl EmbedderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderKind::Hash => "hash",
            EmbedderKind::Http => "http",
        }
    }
}

impl FromStr for EmbedderKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hash" => Ok(EmbedderKind::Hash),
            "http" | "tei" => Ok(EmbedderKind::Http),
            other => Err(format!("unknown embedder '{other}' (expected hash or http)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedderConfig {
    pub kind: EmbedderKind,
    pub dimension: usize,
    /// Base URL of the embeddings server; required for `Http`.
    pub url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Texts per HTTP request. The batch still succeeds or fails as a whole.
    pub batch_size: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            kind: EmbedderKind::Hash,
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            url: None,
            timeout_secs: 30,
            max_retries: 3,
            batch_size: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    pub top_n: usize,
    pub band: BandBounds,
    pub embedder: EmbedderConfig,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            band: BandBounds::default(),
            embedder: EmbedderConfig::default(),
        }
    }
}

impl RankerConfig {
    /// Reads `RR_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unparsable values fall
    /// back to the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RankerConfig::default();

        let kind = match lookup("RR_EMBEDDER") {
            Some(raw) => raw.parse().unwrap_or_else(|err: String| {
                warn!(error = %err, "invalid RR_EMBEDDER; using hash");
                EmbedderKind::Hash
            }),
            None => defaults.embedder.kind,
        };

        RankerConfig {
            top_n: parse_or(&lookup, "RR_TOP_N", defaults.top_n),
            band: BandBounds {
                min: parse_or(&lookup, "RR_BAND_MIN", defaults.band.min),
                max: parse_or(&lookup, "RR_BAND_MAX", defaults.band.max),
            },
            embedder: EmbedderConfig {
                kind,
                dimension: parse_or(
                    &lookup,
                    "RR_EMBEDDING_DIMENSION",
                    defaults.embedder.dimension,
                ),
                url: lookup("RR_EMBEDDING_URL").filter(|url| !url.trim().is_empty()),
                timeout_secs: parse_or(
                    &lookup,
                    "RR_EMBEDDING_TIMEOUT_SECONDS",
                    defaults.embedder.timeout_secs,
                ),
                max_retries: parse_or(
                    &lookup,
                    "RR_EMBEDDING_MAX_RETRIES",
                    defaults.embedder.max_retries,
                ),
                batch_size: parse_or(
                    &lookup,
                    "RR_EMBEDDING_BATCH_SIZE",
                    defaults.embedder.batch_size,
                )
                .max(1),
            },
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparsable config value; using default");
            default
        }),
        None => default,
    }
}
