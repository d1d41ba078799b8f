//! Process configuration
//!
//! Loaded once at startup from environment variables (the server binary calls
//! `dotenvy::dotenv()` first, so a local `.env` file works too).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "Box-to-Box-Game/1.0";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub sparql_endpoint: String,
    pub search_endpoint: String,
    pub query_timeout: Duration,
    pub search_timeout: Duration,
    pub user_agent: String,
    pub athlete_index_path: PathBuf,
    pub manual_achievements_path: PathBuf,
    pub board_max_attempts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            query_timeout: Duration::from_secs(30),
            search_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            athlete_index_path: PathBuf::from("data/players.json"),
            manual_achievements_path: PathBuf::from("data/manual-achievements.json"),
            board_max_attempts: crate::board::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            sparql_endpoint: lookup("SPARQL_ENDPOINT").unwrap_or(defaults.sparql_endpoint),
            search_endpoint: lookup("SEARCH_ENDPOINT").unwrap_or(defaults.search_endpoint),
            query_timeout: Duration::from_secs(parse_or(
                &lookup,
                "QUERY_TIMEOUT_SECS",
                defaults.query_timeout.as_secs(),
            )?),
            search_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SEARCH_TIMEOUT_SECS",
                defaults.search_timeout.as_secs(),
            )?),
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
            athlete_index_path: lookup("ATHLETE_INDEX_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.athlete_index_path),
            manual_achievements_path: lookup("MANUAL_ACHIEVEMENTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.manual_achievements_path),
            board_max_attempts: parse_or(
                &lookup,
                "BOARD_MAX_ATTEMPTS",
                defaults.board_max_attempts,
            )?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
