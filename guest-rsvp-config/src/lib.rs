use core::fmt::{Debug, Display};
use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "rsvp.toml";
pub const ENV_PREFIX: &str = "RSVP_";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// `postgres://...` or `memory://`.
    pub database_url: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub event_year: i32,
    /// 1 = January.
    pub event_month: u32,
    /// Where the client keeps its local settings (the experimental flag).
    pub state_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_owned(),
            event_year: 2026,
            event_month: 8,
            state_file: PathBuf::from("rsvp-client-state.json"),
        }
    }
}

#[derive(Serialize)]
struct ServerDefaults {
    port: u16,
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
    #[error("invalid event month {0}, expected 1..=12")]
    EventMonth(u32),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

fn layered(defaults: Figment) -> Figment {
    defaults
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn get_server_config() -> Result<ServerConfig, ConfigError> {
    Ok(layered(Figment::from(Serialized::defaults(ServerDefaults { port: 5000 }))).extract()?)
}

pub fn get_client_config() -> Result<ClientConfig, ConfigError> {
    let config: ClientConfig =
        layered(Figment::from(Serialized::defaults(ClientConfig::default()))).extract()?;
    if !(1..=12).contains(&config.event_month) {
        return Err(ConfigError::EventMonth(config.event_month));
    }
    Ok(config)
}
