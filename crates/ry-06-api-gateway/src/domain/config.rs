//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Reported by `/health`
    pub service_name: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            rate_limit: RateLimitConfig::default(),
            limits: LimitsConfig::default(),
            timeouts: TimeoutConfig::default(),
            cors: CorsConfig::default(),
            service_name: "real-you".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.rate_limit.enabled && self.rate_limit.requests_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit(
                "requests_per_second cannot be 0".into(),
            ));
        }

        if self.rate_limit.enabled && self.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidRateLimit("burst_size cannot be 0".into()));
        }

        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.timeouts.request.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    /// Settings for handler tests: no rate limiting, short timeout.
    pub fn for_testing() -> Self {
        Self {
            rate_limit: RateLimitConfig {
                enabled: false,
                ..RateLimitConfig::default()
            },
            timeouts: TimeoutConfig {
                request: Duration::from_secs(5),
            },
            ..Self::default()
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3000)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

/// Per-IP rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Sustained requests per second per IP
    pub requests_per_second: u32,
    /// Burst allowance (token bucket)
    pub burst_size: u32,
    /// Enable rate limiting
    pub enabled: bool,
    /// IPs to whitelist from rate limiting
    pub whitelist: Vec<IpAddr>,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP`
    pub trust_proxy_headers: bool,
    /// Idle time after which a client's bucket is dropped
    #[serde(with = "humantime_serde")]
    pub bucket_idle: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 20,
            burst_size: 40,
            enabled: true,
            whitelist: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
            trust_proxy_headers: false,
            bucket_idle: Duration::from_secs(300),
        }
    }
}

/// Request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 64KB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 64 * 1024,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound on every request except `/notify`
    #[serde(with = "humantime_serde")]
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("HTTP port cannot be 0")]
    InvalidPort,

    #[error("Invalid rate limit: {0}")]
    InvalidRateLimit(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_addr().port(), 3000);
        assert_eq!(config.service_name, "real-you");
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut config = GatewayConfig::default();
        config.rate_limit.requests_per_second = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRateLimit(_))
        ));

        // Irrelevant when disabled
        config.rate_limit.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = GatewayConfig::default();
        config.timeouts.request = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"http":{"port":8080},"timeouts":{"request":"45s"}}"#,
        )
        .unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.timeouts.request, Duration::from_secs(45));
        assert_eq!(config.rate_limit.burst_size, 40);
        assert!(config.cors.enabled);
    }
}
