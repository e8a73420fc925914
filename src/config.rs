/// Configuration management for the vidtube backend
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub media: MediaConfig,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
    pub cors_origin: Option<String>,
    pub upload_limit: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
    /// Staging area for multipart uploads before they go to the media store
    pub temp_dir: PathBuf,
}

/// Authentication configuration
///
/// Access and refresh tokens are signed with distinct secrets so a token
/// minted for one purpose can never verify as the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    /// Set `Secure` on auth cookies; disable for plain-http development
    pub cookie_secure: bool,
}

/// External media store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub upload_url: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("VIDTUBE_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("VIDTUBE_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;
        let version = env::var("VIDTUBE_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let cors_origin = env::var("VIDTUBE_CORS_ORIGIN").ok();
        let upload_limit = env::var("VIDTUBE_UPLOAD_LIMIT")
            .unwrap_or_else(|_| "104857600".to_string())
            .parse()
            .unwrap_or(104857600);

        let data_directory: PathBuf = env::var("VIDTUBE_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("VIDTUBE_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("vidtube.sqlite"));
        let temp_dir = env::var("VIDTUBE_TEMP_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("temp"));

        let access_token_secret = env::var("VIDTUBE_ACCESS_TOKEN_SECRET")
            .map_err(|_| ApiError::Validation("Access token secret required".to_string()))?;
        let refresh_token_secret = env::var("VIDTUBE_REFRESH_TOKEN_SECRET")
            .map_err(|_| ApiError::Validation("Refresh token secret required".to_string()))?;
        let access_token_ttl_secs = env::var("VIDTUBE_ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let refresh_token_ttl_secs = env::var("VIDTUBE_REFRESH_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "864000".to_string())
            .parse()
            .unwrap_or(864000);
        let cookie_secure = env::var("VIDTUBE_COOKIE_SECURE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let media_upload_url = env::var("VIDTUBE_MEDIA_UPLOAD_URL")
            .map_err(|_| ApiError::Validation("Media store upload URL required".to_string()))?;
        let media_api_key = env::var("VIDTUBE_MEDIA_API_KEY")
            .map_err(|_| ApiError::Validation("Media store API key required".to_string()))?;
        let media_timeout = env::var("VIDTUBE_MEDIA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        let rate_limit_enabled = env::var("VIDTUBE_RATE_LIMITS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let requests_per_second = env::var("VIDTUBE_RATE_LIMIT_RPS")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .unwrap_or(50);
        let burst_size = env::var("VIDTUBE_RATE_LIMIT_BURST")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .unwrap_or(100);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
                cors_origin,
                upload_limit,
            },
            storage: StorageConfig {
                data_directory,
                database,
                temp_dir,
            },
            authentication: AuthConfig {
                access_token_secret,
                refresh_token_secret,
                access_token_ttl_secs,
                refresh_token_ttl_secs,
                cookie_secure,
            },
            media: MediaConfig {
                upload_url: media_upload_url,
                api_key: media_api_key,
                request_timeout_secs: media_timeout,
            },
            rate_limit: RateLimitSettings {
                enabled: rate_limit_enabled,
                requests_per_second,
                burst_size,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.authentication.access_token_secret.len() < 32 {
            return Err(ApiError::Validation(
                "Access token secret must be at least 32 characters".to_string(),
            ));
        }

        if self.authentication.refresh_token_secret.len() < 32 {
            return Err(ApiError::Validation(
                "Refresh token secret must be at least 32 characters".to_string(),
            ));
        }

        // Shared secret would collapse the access/refresh namespaces
        if self.authentication.access_token_secret == self.authentication.refresh_token_secret {
            return Err(ApiError::Validation(
                "Access and refresh token secrets must differ".to_string(),
            ));
        }

        if self.authentication.access_token_ttl_secs <= 0
            || self.authentication.refresh_token_ttl_secs <= 0
        {
            return Err(ApiError::Validation(
                "Token lifetimes must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 8080,
                version: "0.1.0".to_string(),
                cors_origin: None,
                upload_limit: 1024,
            },
            storage: StorageConfig {
                data_directory: PathBuf::from("./data"),
                database: PathBuf::from(":memory:"),
                temp_dir: PathBuf::from("./data/temp"),
            },
            authentication: AuthConfig {
                access_token_secret: "access-secret-for-tests-0123456789ab".to_string(),
                refresh_token_secret: "refresh-secret-for-tests-0123456789a".to_string(),
                access_token_ttl_secs: 3600,
                refresh_token_ttl_secs: 864000,
                cookie_secure: false,
            },
            media: MediaConfig {
                upload_url: "http://localhost:9000/upload".to_string(),
                api_key: "test-key".to_string(),
                request_timeout_secs: 5,
            },
            rate_limit: RateLimitSettings {
                enabled: false,
                requests_per_second: 50,
                burst_size: 100,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn equal_secrets_rejected() {
        let mut config = test_config();
        config.authentication.refresh_token_secret =
            config.authentication.access_token_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn short_secret_rejected() {
        let mut config = test_config();
        config.authentication.access_token_secret = "short".to_string();
        assert!(config.validate().is_err());
    }
}
