//! Front-end relay configuration

use std::env;

use crate::config::environment::{parse_var, ConfigError};

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Base URL of the delivery API, always ending with '/'
    pub api_url: String,
    pub host: String,
    pub port: u16,
    pub session_ttl_secs: i64,
    pub secure_cookies: bool,
}

impl RelayConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(&api_url.into()),
            host: "0.0.0.0".to_string(),
            port: 8001,
            session_ttl_secs: 86_400,
            secure_cookies: false,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var("API_URL").map_err(|_| ConfigError::Missing("API_URL"))?;
        let mut config = Self::new(api_url);
        config.host = env::var("RELAY_HOST").unwrap_or(config.host);
        config.port = parse_var("RELAY_PORT", config.port)?;
        config.session_ttl_secs = parse_var("SESSION_TTL_SECS", config.session_ttl_secs)?;
        config.secure_cookies = parse_var("SECURE_COOKIES", config.secure_cookies)?;
        Ok(config)
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_gets_trailing_slash() {
        assert_eq!(RelayConfig::new("http://api:8000").api_url, "http://api:8000/");
        assert_eq!(RelayConfig::new("http://api:8000/v1/").api_url, "http://api:8000/v1/");
    }
}
