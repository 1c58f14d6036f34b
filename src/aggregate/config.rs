//! Aggregation budgets: per-source item caps and timeouts for the two source
//! families. Compiled-in defaults, overridable from a TOML file or a path
//! named by `AGGREGATOR_CONFIG_PATH`.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_PATH_ENV: &str = "AGGREGATOR_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/aggregator.toml";

/// Budgets for one descriptor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchBudget {
    /// Most items one source may contribute per round.
    pub per_source_cap: usize,
    /// Deadline for the upstream exchange, cookie priming included.
    pub request_timeout: Duration,
    /// Hard ceiling on one worker from dispatch to outcome.
    pub global_timeout: Duration,
}

impl FetchBudget {
    /// Trending boards: deep lists behind slow, picky endpoints.
    pub const fn trends_default() -> Self {
        Self {
            per_source_cap: 15,
            request_timeout: Duration::from_secs(8),
            global_timeout: Duration::from_secs(12),
        }
    }

    /// News feeds: short lists from fast endpoints.
    pub const fn feeds_default() -> Self {
        Self {
            per_source_cap: 4,
            request_timeout: Duration::from_secs(5),
            global_timeout: Duration::from_secs(10),
        }
    }

    fn apply(&mut self, raw: &RawBudget) {
        if let Some(cap) = raw.per_source_cap {
            self.per_source_cap = cap;
        }
        if let Some(secs) = raw.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = raw.global_timeout_secs {
            self.global_timeout = Duration::from_secs(secs);
        }
    }
}

/// Budgets for both families, the unit the facade consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub trends: FetchBudget,
    pub feeds: FetchBudget,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            trends: FetchBudget::trends_default(),
            feeds: FetchBudget::feeds_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    trends: RawBudget,
    #[serde(default)]
    feeds: RawBudget,
}

#[derive(Debug, Default, Deserialize)]
struct RawBudget {
    per_source_cap: Option<usize>,
    request_timeout_secs: Option<u64>,
    global_timeout_secs: Option<u64>,
}

/// Loads budgets from `AGGREGATOR_CONFIG_PATH` if set, else from
/// `config/aggregator.toml` if present, else compiled-in defaults. A missing
/// file is fine; an unreadable or malformed one is an error so a typo does
/// not silently run with defaults.
pub fn load_default() -> Result<AggregatorConfig> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return load_from(Path::new(&path));
    }
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if path.exists() {
        return load_from(path);
    }
    Ok(AggregatorConfig::default())
}

pub fn load_from(path: &Path) -> Result<AggregatorConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading aggregator config {}", path.display()))?;
    let parsed: RawConfig = toml::from_str(&raw)
        .with_context(|| format!("parsing aggregator config {}", path.display()))?;
    let mut config = AggregatorConfig::default();
    config.trends.apply(&parsed.trends);
    config.feeds.apply(&parsed.feeds);
    Ok(config)
}
