use std::env;
use std::net::SocketAddr;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub generation: GenerationConfig,
    pub request: RequestConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Chat-completion provider configuration
///
/// `api_key` stays optional here: a missing key is reported per request as a
/// configuration error rather than preventing the server from starting.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

// Hand-written so the key never reaches a log line through `{:?}`.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Name of the cookie carrying the browser session id.
    pub session_cookie: String,
    /// Idle sessions older than this are dropped on the next write.
    pub session_ttl_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let provider = ProviderConfig {
            api_key: env::var("OPENAI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| ProviderConfig::DEFAULT_BASE_URL.to_string()),
            model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| ProviderConfig::DEFAULT_MODEL.to_string()),
        };

        let defaults = GenerationConfig::default();
        let generation = GenerationConfig {
            temperature: parse_env("GENERATION_TEMPERATURE").unwrap_or(defaults.temperature),
            max_tokens: parse_env("GENERATION_MAX_TOKENS").unwrap_or(defaults.max_tokens),
        };

        let request = RequestConfig {
            timeout_ms: parse_env("REQUEST_TIMEOUT_MS")
                .unwrap_or(RequestConfig::default().timeout_ms),
        };

        let bind = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let server = ServerConfig {
            bind_addr: bind.parse().map_err(|e| AppError::Config {
                message: format!("BIND_ADDR '{}' is not a socket address: {}", bind, e),
            })?,
            session_cookie: env::var("SESSION_COOKIE").unwrap_or_else(|_| "rg_session".to_string()),
            session_ttl_secs: parse_env("SESSION_TTL_SECS").unwrap_or(86_400),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            provider,
            generation,
            request,
            server,
            logging,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl ProviderConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 3000,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 60_000 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            session_cookie: "rg_session".to_string(),
            session_ttl_secs: 86_400,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
            request: RequestConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
