use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::error::{AppError, Result};

pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_INFERENCE_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_CORS_ORIGIN: &str = "https://content-extract-ui.vercel.app";

/// Which browser origins may call the API.
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedOrigin {
    Any,
    Exact(HeaderValue),
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub huggingface_api_key: String,
    pub summary_model: String,
    pub inference_api_base: String,
    pub allowed_origin: AllowedOrigin,
    pub summary_max_attempts: u32,
    pub summary_retry_backoff: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup, so tests
    /// never have to touch the process environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let huggingface_api_key = lookup("HUGGINGFACE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("HUGGINGFACE_API_KEY is not set".to_string()))?;

        // Load server configuration with defaults
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let summary_model = lookup("SUMMARY_MODEL").unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string());
        let inference_api_base = lookup("INFERENCE_API_BASE")
            .unwrap_or_else(|| DEFAULT_INFERENCE_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let allowed_origin = parse_origin(&origin)?;

        let summary_max_attempts = parse_number::<u32>(&lookup, "SUMMARY_MAX_ATTEMPTS", 3)?;
        if summary_max_attempts == 0 {
            return Err(AppError::ConfigError("SUMMARY_MAX_ATTEMPTS must be at least 1".to_string()));
        }
        let backoff_ms = parse_number::<u64>(&lookup, "SUMMARY_RETRY_BACKOFF_MS", 3000)?;
        let timeout_secs = parse_number::<u64>(&lookup, "REQUEST_TIMEOUT_SECS", 90)?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            huggingface_api_key,
            summary_model,
            inference_api_base,
            allowed_origin,
            summary_max_attempts,
            summary_retry_backoff: Duration::from_millis(backoff_ms),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_origin(origin: &str) -> Result<AllowedOrigin> {
    let origin = origin.trim();
    if origin == "*" {
        return Ok(AllowedOrigin::Any);
    }
    HeaderValue::from_str(origin)
        .map(AllowedOrigin::Exact)
        .map_err(|e| AppError::ConfigError(format!("Invalid CORS origin: {}", e)))
}

fn parse_number<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
    }
}

// The API key must never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("huggingface_api_key", &"<redacted>")
            .field("summary_model", &self.summary_model)
            .field("inference_api_base", &self.inference_api_base)
            .field("allowed_origin", &self.allowed_origin)
            .field("summary_max_attempts", &self.summary_max_attempts)
            .field("summary_retry_backoff", &self.summary_retry_backoff)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = config_from(&[("HUGGINGFACE_API_KEY", "hf_test")]).unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.summary_model, DEFAULT_SUMMARY_MODEL);
        assert_eq!(config.inference_api_base, DEFAULT_INFERENCE_API_BASE);
        assert_eq!(
            config.allowed_origin,
            AllowedOrigin::Exact(HeaderValue::from_static(DEFAULT_CORS_ORIGIN))
        );
        assert_eq!(config.summary_max_attempts, 3);
        assert_eq!(config.summary_retry_backoff, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(90));
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        assert!(matches!(config_from(&[]), Err(AppError::ConfigError(_))));
        assert!(matches!(
            config_from(&[("HUGGINGFACE_API_KEY", "  ")]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("HUGGINGFACE_API_KEY", "hf_test"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("INFERENCE_API_BASE", "http://localhost:9000/"),
            ("CORS_ORIGIN", "*"),
            ("SUMMARY_RETRY_BACKOFF_MS", "10"),
        ])
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.inference_api_base, "http://localhost:9000");
        assert_eq!(config.allowed_origin, AllowedOrigin::Any);
        assert_eq!(config.summary_retry_backoff, Duration::from_millis(10));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for (name, value) in [
            ("PORT", "not-a-port"),
            ("HOST", "localhost:80"),
            ("SUMMARY_MAX_ATTEMPTS", "0"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ] {
            let result = config_from(&[("HUGGINGFACE_API_KEY", "hf_test"), (name, value)]);
            assert!(matches!(result, Err(AppError::ConfigError(_))), "{} = {}", name, value);
        }
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = config_from(&[("HUGGINGFACE_API_KEY", "hf_very_secret")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hf_very_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
