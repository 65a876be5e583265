use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::db::DEFAULT_SURGERY_TYPE;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent when `DATABASE_URL` is unset; the service then runs on the
    /// in-memory store.
    pub database: Option<DatabaseConfig>,
    pub app: AppConfig,
    pub booking: BookingConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub surgery_type: i32,
}

/// Ids preloaded into the in-memory store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    pub patient_ids: Vec<i64>,
    pub doctor_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration (optional)
        let database = match env::var("DATABASE_URL") {
            Ok(url) => {
                let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
                    Ok(val) => val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
                    Err(_) => 10,
                };
                let min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
                    Ok(val) => val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?,
                    Err(_) => 1,
                };

                Some(DatabaseConfig {
                    url,
                    max_connections,
                    min_connections,
                })
            }
            Err(_) => None,
        };

        // App configuration
        let environment = env::var("APP_ENVIRONMENT")
            .ok()
            .and_then(|val| val.parse::<Environment>().ok())
            .unwrap_or_default();
        let name = env::var("APP_NAME").unwrap_or_else(|_| "Patient Booking".to_string());

        let surgery_type = match env::var("BOOKING_SURGERY_TYPE") {
            Ok(val) => val.parse().context("Failed to parse BOOKING_SURGERY_TYPE")?,
            Err(_) => DEFAULT_SURGERY_TYPE,
        };

        let seed = SeedConfig {
            patient_ids: parse_id_list(env::var("SEED_PATIENT_IDS").ok().as_deref())
                .context("Failed to parse SEED_PATIENT_IDS")?,
            doctor_ids: parse_id_list(env::var("SEED_DOCTOR_IDS").ok().as_deref())
                .context("Failed to parse SEED_DOCTOR_IDS")?,
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database,
            app: AppConfig { name, environment },
            booking: BookingConfig { surgery_type },
            seed,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: 8000,
            },
            database: None,
            app: AppConfig {
                name: "Patient Booking".to_string(),
                environment: Environment::Development,
            },
            booking: BookingConfig {
                surgery_type: DEFAULT_SURGERY_TYPE,
            },
            seed: SeedConfig::default(),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Parses a comma-separated id list; blank entries are skipped.
fn parse_id_list(raw: Option<&str>) -> Result<Vec<i64>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().with_context(|| format!("invalid id `{}`", part)))
        .collect()
}

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}
