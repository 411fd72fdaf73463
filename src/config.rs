use std::env;

use thiserror::Error;

use crate::services::session_service::Credentials;

pub const API_URL_VAR: &str = "LEDGER_API_URL";
pub const API_KEY_VAR: &str = "LEDGER_API_KEY";
pub const USER_MOBILE_VAR: &str = "LEDGER_USER_MOBILE";
pub const USER_PASSWORD_VAR: &str = "LEDGER_USER_PASSWORD";

#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger service root, without a trailing `/`
    pub api_url: String,
    pub api_key: String,
    pub user_mobile: String,
    pub user_password: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{0} must be an http(s) URL, got {1:?}")]
    InvalidUrl(&'static str, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let api_url = required(API_URL_VAR)?.trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(API_URL_VAR, api_url));
        }

        Ok(Config {
            api_url,
            api_key: required(API_KEY_VAR)?,
            user_mobile: required(USER_MOBILE_VAR)?,
            user_password: required(USER_PASSWORD_VAR)?,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            mobile: self.user_mobile.clone(),
            password: self.user_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (API_URL_VAR, "https://ledger.example.com/api/"),
            (API_KEY_VAR, "secret"),
            (USER_MOBILE_VAR, "9999900000"),
            (USER_PASSWORD_VAR, "password123"),
        ]
    }

    #[test]
    fn test_reads_every_variable() {
        let config = Config::from_lookup(lookup(&complete())).unwrap();
        assert_eq!(config.api_url, "https://ledger.example.com/api");
        assert_eq!(config.credentials().mobile, "9999900000");
    }

    #[test]
    fn test_missing_or_blank_variable() {
        let mut vars = complete();
        vars.retain(|(k, _)| *k != API_KEY_VAR);
        assert_eq!(
            Config::from_lookup(lookup(&vars)).unwrap_err(),
            ConfigError::Missing(API_KEY_VAR)
        );

        let mut vars = complete();
        vars[3] = (USER_PASSWORD_VAR, "   ");
        assert_eq!(
            Config::from_lookup(lookup(&vars)).unwrap_err(),
            ConfigError::Missing(USER_PASSWORD_VAR)
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut vars = complete();
        vars[0] = (API_URL_VAR, "ledger.local");
        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidUrl(_, _))
        ));
    }
}
