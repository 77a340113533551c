use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::competition::scorer::DEFAULT_PLACEHOLDER_SEED;
use crate::workflows::rotation::{RotationWeights, WeightError};

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
    pub engine: EngineConfig,
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

        let engine = EngineConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine,
        })
    }
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

/// Tunables for the rotation and competition engines. The weight-sum
/// invariant is checked here, at load time, so a misconfigured deployment
/// fails fast instead of producing skewed assignments.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub rotation_weights: RotationWeights,
    pub placeholder_seed: u64,
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = RotationWeights::default();
        let fairness = parse_weight("ROTATION_FAIRNESS_WEIGHT", defaults.fairness)?;
        let skill = parse_weight("ROTATION_SKILL_WEIGHT", defaults.skill)?;
        let availability = parse_weight("ROTATION_AVAILABILITY_WEIGHT", defaults.availability)?;

        let rotation_weights = RotationWeights::new(fairness, skill, availability)
            .map_err(|source| ConfigError::InvalidWeights { source })?;

        let placeholder_seed = match env::var("COMPETITION_PLACEHOLDER_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSeed)?,
            Err(_) => DEFAULT_PLACEHOLDER_SEED,
        };

        Ok(Self {
            rotation_weights,
            placeholder_seed,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rotation_weights: RotationWeights::default(),
            placeholder_seed: DEFAULT_PLACEHOLDER_SEED,
        }
    }
}

fn parse_weight(var: &str, default: f64) -> Result<f64, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidWeight {
            var: var.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { var: String },
    InvalidWeights { source: WeightError },
    InvalidSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { var } => {
                write!(f, "{var} must be a floating point number")
            }
            ConfigError::InvalidWeights { source } => write!(f, "{source}"),
            ConfigError::InvalidSeed => {
                write!(f, "COMPETITION_PLACEHOLDER_SEED must be a valid u64")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidWeight { .. } | ConfigError::InvalidSeed => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWeights { source } => Some(source),
        }
    }
}
