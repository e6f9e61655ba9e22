use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

use crate::routes::LicenciaRouteScheme;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub http_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub licencia_routes: LicenciaRouteScheme,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            session_file: PathBuf::from(".intranet-session.json"),
            http_timeout_secs: 30,
            cache_ttl_secs: 3600,
            licencia_routes: LicenciaRouteScheme::Actions,
            log_dir: "logs".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("INTRANET_API_URL")
                .unwrap_or(defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            session_file: env::var("INTRANET_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            http_timeout_secs: parse_var("INTRANET_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            cache_ttl_secs: parse_var("INTRANET_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            licencia_routes: match env::var("INTRANET_LICENCIA_ROUTES") {
                Ok(raw) => parse_scheme(&raw)?,
                Err(_) => defaults.licencia_routes,
            },
            log_dir: env::var("INTRANET_LOG_DIR").unwrap_or(defaults.log_dir),
        })
    }
}

fn parse_var(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => parse_positive(name, &raw),
        Err(_) => Ok(default),
    }
}

// a zero timeout fails every request, a zero TTL disables the cache
fn parse_positive(name: &str, raw: &str) -> Result<u64> {
    let value: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{name} must be a positive integer, got {raw:?}"))?;
    if value == 0 {
        bail!("{name} must be a positive integer, got {raw:?}");
    }
    Ok(value)
}

fn parse_scheme(raw: &str) -> Result<LicenciaRouteScheme> {
    match raw.trim().to_lowercase().as_str() {
        "actions" => Ok(LicenciaRouteScheme::Actions),
        "legacy" => Ok(LicenciaRouteScheme::Legacy),
        other => bail!("INTRANET_LICENCIA_ROUTES must be `actions` or `legacy`, got {other:?}"),
    }
}
