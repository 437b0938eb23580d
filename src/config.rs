use std::{env, time::Duration};

use anyhow::{Context, Result};

pub const DEFAULT_VERIFY_API_URL: &str =
    "https://gladconnect-license-verification-production.up.railway.app/api/verify";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_TTL_MINUTES: u64 = 120;
const DEFAULT_MAX_UPLOAD_MB: usize = 20;

/// Runtime settings resolved from the process environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub verify_api_url: String,
    /// `None` leaves the transport default in place.
    pub verify_timeout: Option<Duration>,
    pub session_ttl: Duration,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            verify_api_url: DEFAULT_VERIFY_API_URL.to_string(),
            verify_timeout: None,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_MINUTES * 60),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);

        let verify_api_url = lookup("VERIFY_API_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.verify_api_url);

        let verify_timeout =
            parse_var::<u64, _>(&lookup, "VERIFY_TIMEOUT_SECS")?.map(Duration::from_secs);

        let session_ttl = parse_var::<u64, _>(&lookup, "SESSION_TTL_MINUTES")?
            .map(|minutes| Duration::from_secs(minutes * 60))
            .unwrap_or(defaults.session_ttl);

        let max_upload_bytes = parse_var::<usize, _>(&lookup, "MAX_UPLOAD_MB")?
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(defaults.max_upload_bytes);

        Ok(Self {
            port,
            verify_api_url,
            verify_timeout,
            session_ttl,
            max_upload_bytes,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<T>()
        .map(Some)
        .with_context(|| format!("{key} must be a non-negative integer, got `{raw}`"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.verify_api_url, DEFAULT_VERIFY_API_URL);
        assert!(config.verify_timeout.is_none());
        assert_eq!(config.session_ttl, Duration::from_secs(120 * 60));
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("VERIFY_API_URL", " http://localhost:9000/api/verify "),
            ("VERIFY_TIMEOUT_SECS", "30"),
            ("SESSION_TTL_MINUTES", "5"),
            ("MAX_UPLOAD_MB", "2"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.verify_api_url, "http://localhost:9000/api/verify");
        assert_eq!(config.verify_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.session_ttl, Duration::from_secs(300));
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "  "), ("VERIFY_API_URL", "")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.verify_api_url, DEFAULT_VERIFY_API_URL);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(format!("{err}").contains("PORT"));
    }
}
