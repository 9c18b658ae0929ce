use newswire_scraper::{ExtractError, SelectorSet};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: String, reason: String },

    #[error(transparent)]
    Selector(#[from] ExtractError),
}

/// One monitored listing page. Immutable after startup.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,
    pub selectors: SelectorSet,
}

/// Process configuration, sourced from the environment (a `.env` file is
/// loaded by the binary before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub sources: Vec<SourceConfig>,
    pub scrape_interval: Duration,
    /// Index offset between sources sharing the collection, so each source's
    /// records keep a distinct contiguous range.
    pub offset_step: i64,
}

/// Selector set matching the monitored sites' listing markup.
pub fn default_selectors() -> SelectorSet {
    SelectorSet {
        headline: "div.cms_Chrome div.title > a".to_string(),
        description: "div.cms_Chrome div.description".to_string(),
        author: "div.cms_Chrome div.citation > a".to_string(),
        image: "div.cms_Chrome div.pull-right > a > img".to_string(),
        date: "div.cms_Chrome div.citation > span".to_string(),
    }
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_PATH: &str = "~/.config/newswire/newswire.db";
const DEFAULT_INTERVAL_SECS: u64 = 3600;
const DEFAULT_OFFSET_STEP: i64 = 1000;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let scrape_interval =
            interval_from_secs(parse_var("SCRAPE_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?)?;
        let offset_step = parse_var("INDEX_OFFSET_STEP", DEFAULT_OFFSET_STEP)?;

        let raw_path = env_var("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        let database_path = PathBuf::from(shellexpand::tilde(&raw_path).as_ref());

        let sources = load_sources()?;

        Ok(Config {
            port,
            database_path,
            sources,
            scrape_interval,
            offset_step,
        })
    }
}

/// Read `FETCH_URL_1`, `FETCH_URL_2`, ... until the numbering stops. Every
/// source gets the built-in selector set; selectors are compiled here so a
/// bad one aborts startup rather than surfacing mid-cycle.
fn load_sources() -> Result<Vec<SourceConfig>, ConfigError> {
    let selectors = default_selectors();
    selectors.compile()?;

    let mut sources = Vec::new();
    for n in 1.. {
        let var = format!("FETCH_URL_{}", n);
        let Some(raw) = env_var(&var) else { break };

        Url::parse(&raw).map_err(|e| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        })?;

        sources.push(SourceConfig {
            url: raw,
            selectors: selectors.clone(),
        });
    }

    if sources.is_empty() {
        return Err(ConfigError::MissingVar("FETCH_URL_1"));
    }

    Ok(sources)
}

// The scheduler's interval timer requires a non-zero period.
fn interval_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidVar {
            var: "SCRAPE_INTERVAL_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var: name.to_string(),
            reason: e.to_string(),
        }),
    }
}
