//! Server settings, from command-line flags or the environment.

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use crate::directions::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, OpenRouteServiceConfig};
use crate::trip::DEFAULT_MAX_DAILY_HOURS;

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Mountain shelter directory and trip planning API"
)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// JSON shelter list used when no database is configured
    #[arg(long, env = "SHELTERS_JSON", default_value = "backend/data/shelters.json")]
    pub shelters_json: PathBuf,

    /// PostgreSQL connection string; takes precedence over the JSON file
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// OpenRouteService API key; routing endpoints answer 503 without it
    #[arg(long, env = "OPENROUTESERVICE_API_KEY", hide_env_values = true)]
    pub ors_api_key: Option<String>,

    #[arg(long, env = "OPENROUTESERVICE_URL", default_value = DEFAULT_BASE_URL)]
    pub ors_base_url: String,

    #[arg(long, env = "ROUTING_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub routing_timeout_secs: u64,

    /// Default walking budget per day when a trip request sets none
    #[arg(
        long,
        env = "MAX_DAILY_HOURS",
        default_value_t = DEFAULT_MAX_DAILY_HOURS,
        value_parser = parse_daily_hours
    )]
    pub max_daily_hours: f64,
}

fn parse_daily_hours(raw: &str) -> Result<f64, String> {
    let hours: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{raw:?} is not a number"))?;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(format!("daily walking limit must be positive, got {raw}"));
    }
    Ok(hours)
}

impl Config {
    /// Routing client settings, if an API key is available.
    pub fn routing(&self) -> Option<OpenRouteServiceConfig> {
        let key = self.ors_api_key.as_deref().map(str::trim)?;
        if key.is_empty() {
            return None;
        }
        Some(
            OpenRouteServiceConfig::new(key)
                .with_base_url(self.ors_base_url.clone())
                .with_timeout(self.routing_timeout_secs),
        )
    }
}
