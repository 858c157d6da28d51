use std::env;

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub openai_api_key: String,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET is not set. It must be configured in production environments."
            );
            "secret".to_string()
        });

        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
            tracing::warn!(
                "OPENAI_API_KEY is not set. It must be configured in production environments."
            );
            "test-key".to_string()
        });

        Ok(Self {
            server_port,
            database_url,
            jwt_secret,
            openai_api_key,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
}
