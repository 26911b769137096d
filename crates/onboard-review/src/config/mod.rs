use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub review: ReviewConfig,
    pub game: GameConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_base_url = env::var("REVIEW_API_BASE_URL")
            .unwrap_or_else(|_| ReviewConfig::DEFAULT_API_BASE_URL.to_string());
        let timeout_ms = match env::var("REVIEW_API_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => ReviewConfig::DEFAULT_TIMEOUT_MS,
        };
        let archive_dir = env::var("REVIEW_ARCHIVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(ReviewConfig::DEFAULT_ARCHIVE_DIR));

        let game = GameConfig {
            api_url: non_empty_var("GAME_API_URL"),
            api_key: non_empty_var("GAME_API_KEY"),
            player_name: non_empty_var("GAME_PLAYER_NAME")
                .unwrap_or_else(|| GameConfig::DEFAULT_PLAYER_NAME.to_string()),
            downloads_dir: env::var("GAME_DOWNLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(GameConfig::DEFAULT_DOWNLOADS_DIR)),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            review: ReviewConfig {
                api_base_url,
                timeout_ms,
                archive_dir,
            },
            game,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where review clients come from: the upstream `next-client` API for the
/// fetcher, and the record archive served by this process.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub api_base_url: String,
    pub timeout_ms: u64,
    pub archive_dir: PathBuf,
}

impl ReviewConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "http://127.0.0.1:3000/api";
    pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
    pub const DEFAULT_ARCHIVE_DIR: &'static str = "out_archive";

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            archive_dir: PathBuf::from(Self::DEFAULT_ARCHIVE_DIR),
        }
    }
}

/// Onboarding game server credentials and local document storage.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub player_name: String,
    pub downloads_dir: PathBuf,
}

impl GameConfig {
    pub const DEFAULT_PLAYER_NAME: &'static str = "robo-clerk";
    pub const DEFAULT_DOWNLOADS_DIR: &'static str = "downloads";
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "REVIEW_API_TIMEOUT_MS must be a positive number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
