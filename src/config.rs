use std::num::ParseIntError;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MONGODB_URI not found in environment variables")]
    MissingMongoUri,
    #[error("invalid PORT value `{value}`")]
    InvalidPort {
        value: String,
        source: ParseIntError,
    },
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("MONGODB_URI").ok(),
            std::env::var("PORT").ok(),
        )
    }

    // Empty env values count as unset.
    fn from_vars(mongodb_uri: Option<String>, port: Option<String>) -> Result<Self, ConfigError> {
        let mongodb_uri = mongodb_uri
            .filter(|uri| !uri.is_empty())
            .ok_or(ConfigError::MissingMongoUri)?;

        let port = match port.filter(|port| !port.is_empty()) {
            Some(raw) => raw
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value: raw, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self { mongodb_uri, port })
    }
}
