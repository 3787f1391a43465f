//! Runtime configuration
//!
//! Loaded from the environment (optionally seeded from a `.env` file).
//! Bad values are logged and replaced by their defaults; loading never fails.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 3;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Per-site timeout for live nutrition lookups
    pub fetch_timeout: Duration,
    /// How many sites are fetched at once
    pub fetch_concurrency: usize,
    /// Whether the live lookup tier runs at all
    pub live_lookup: bool,
    /// JSON file replacing the built-in catalog
    pub catalog_path: Option<PathBuf>,
    pub estimator_url: Option<String>,
    pub estimator_key: Option<String>,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("CALORIE_DATABASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let fetch_concurrency: usize = parse_or(
            &lookup,
            "CALORIE_FETCH_CONCURRENCY",
            DEFAULT_FETCH_CONCURRENCY,
        );

        Self {
            database_path,
            bind_addr: parse_or(&lookup, "CALORIE_BIND_ADDR", default_bind_addr()),
            fetch_timeout: Duration::from_secs(parse_or(
                &lookup,
                "CALORIE_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )),
            fetch_concurrency: fetch_concurrency.max(1),
            live_lookup: parse_flag(&lookup, "CALORIE_LIVE_LOOKUP", true),
            catalog_path: non_empty(&lookup, "CALORIE_CATALOG_PATH").map(PathBuf::from),
            estimator_url: non_empty(&lookup, "CALORIE_ESTIMATOR_URL"),
            estimator_key: non_empty(&lookup, "CALORIE_ESTIMATOR_KEY"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

/// `<project>/data/calorie.db`, walking up out of `target/{debug,release}`
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("calorie.db");
    path
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}; using default {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key).map(|s| s.to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        Some(v) => {
            warn!("Invalid {key} value {v:?}; using default {default}");
            default
        }
        None => default,
    }
}
