//! Record Store connection settings.

use std::time::Duration;

use crate::error::ConfigError;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const TABLE_VAR: &str = "USERS_TABLE";
pub const TIMEOUT_VAR: &str = "STORE_TIMEOUT_SECS";

pub const DEFAULT_TABLE: &str = "users";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the Record Store lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project URL without a trailing slash.
    pub url: String,
    /// Anonymous API key, sent as both `apikey` and bearer token.
    pub api_key: String,
    pub table: String,
    /// Per-request timeout. Only native stores honor it.
    pub timeout: Duration,
}

impl StoreConfig {
    /// Validate a URL and key, using the default table and timeout.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::Missing(URL_VAR));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }

        let api_key = api_key.into();
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::Missing(KEY_VAR));
        }

        Ok(Self {
            url: url.to_string(),
            api_key: api_key.to_string(),
            table: DEFAULT_TABLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        if !table.trim().is_empty() {
            self.table = table.trim().to_string();
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from named variables resolved by `lookup`.
    ///
    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` are required; `USERS_TABLE`
    /// and `STORE_TIMEOUT_SECS` fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(URL_VAR).ok_or(ConfigError::Missing(URL_VAR))?;
        let api_key = lookup(KEY_VAR).ok_or(ConfigError::Missing(KEY_VAR))?;
        let mut config = Self::new(url, api_key)?;

        if let Some(table) = lookup(TABLE_VAR) {
            config = config.with_table(table);
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Base URL of the table endpoint.
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = StoreConfig::new("https://abc.supabase.co/", "key").unwrap();
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(config.table, "users");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.table_url(), "https://abc.supabase.co/rest/v1/users");
    }

    #[test]
    fn test_new_rejects_bad_url() {
        assert_eq!(
            StoreConfig::new("abc.supabase.co", "key"),
            Err(ConfigError::InvalidUrl("abc.supabase.co".to_string()))
        );
        assert_eq!(
            StoreConfig::new("  ", "key"),
            Err(ConfigError::Missing(URL_VAR))
        );
    }

    #[test]
    fn test_new_requires_key() {
        assert_eq!(
            StoreConfig::new("http://localhost:54321", ""),
            Err(ConfigError::Missing(KEY_VAR))
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "http://localhost:54321"),
            (KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(config.table, DEFAULT_TABLE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "http://localhost:54321"),
            (KEY_VAR, "anon"),
            (TABLE_VAR, "people"),
            (TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.table, "people");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_missing_and_invalid() {
        assert_eq!(
            StoreConfig::from_lookup(lookup(&[(KEY_VAR, "anon")])),
            Err(ConfigError::Missing(URL_VAR))
        );
        assert_eq!(
            StoreConfig::from_lookup(lookup(&[
                (URL_VAR, "http://localhost:54321"),
                (KEY_VAR, "anon"),
                (TIMEOUT_VAR, "soon"),
            ])),
            Err(ConfigError::InvalidTimeout("soon".to_string()))
        );
    }
}
