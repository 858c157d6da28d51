mod app_config;
mod database;

pub use app_config::{AppConfig, ConfigError};
pub use database::establish_connection;
