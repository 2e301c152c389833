use std::net::SocketAddr;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_IMAGE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TMDB_API_KEY is not set")]
    MissingApiKey,

    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("{0:?} is not a valid bind address")]
    InvalidAddress(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_image_url: String,
    pub bind_address: String,
    pub port: u16,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::info!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tmdb_api_key = non_empty("TMDB_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let port = match non_empty("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };

        let config = Config {
            tmdb_api_key,
            tmdb_base_url: non_empty("TMDB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_owned()),
            tmdb_image_url: non_empty("TMDB_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_IMAGE_URL.to_owned()),
            bind_address: non_empty("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
        };
        config.socket_addr()?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.bind_address.clone()))
    }
}
