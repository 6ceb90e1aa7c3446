use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Model provider credential. Checked per request, not at startup.
    pub google_api_key: Option<String>,
    /// Headlines provider credential. Checked per request, not at startup.
    pub news_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub news_api_base_url: String,
    pub default_country: String,
    pub news_page_size: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let google_api_key = non_empty_var("GOOGLE_API_KEY");
        let news_api_key = non_empty_var("NEWS_API_KEY");

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        let news_page_size = parse_var("NEWS_PAGE_SIZE", 20u32)?;
        let temperature = parse_var("MODEL_TEMPERATURE", 0.9f32)?;
        let timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", 60u64)?;

        Ok(Config {
            server_addr,
            google_api_key,
            news_api_key,
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            news_api_base_url: env::var("NEWS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_NEWS_API_BASE_URL.to_string()),
            default_country: env::var("NEWS_COUNTRY").unwrap_or_else(|_| "us".to_string()),
            news_page_size,
            temperature,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn google_api_key(&self) -> Result<&str> {
        self.google_api_key
            .as_deref()
            .ok_or_else(|| AppError::ConfigError("GOOGLE_API_KEY not configured".to_string()))
    }

    pub fn news_api_key(&self) -> Result<&str> {
        self.news_api_key
            .as_deref()
            .ok_or_else(|| AppError::ConfigError("NEWS_API_KEY not configured".to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            google_api_key: None,
            news_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            news_api_base_url: DEFAULT_NEWS_API_BASE_URL.to_string(),
            default_country: "us".to_string(),
            news_page_size: 20,
            temperature: 0.9,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("google_api_key", &self.google_api_key.as_deref().map(|_| "<redacted>"))
            .field("news_api_key", &self.news_api_key.as_deref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("news_api_base_url", &self.news_api_base_url)
            .field("default_country", &self.default_country)
            .field("news_page_size", &self.news_page_size)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_are_config_errors() {
        let config = Config::default();
        let err = config.google_api_key().unwrap_err();
        assert_eq!(err.to_string(), "GOOGLE_API_KEY not configured");
        let err = config.news_api_key().unwrap_err();
        assert_eq!(err.to_string(), "NEWS_API_KEY not configured");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = Config {
            google_api_key: Some("super-secret".to_string()),
            ..Config::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
