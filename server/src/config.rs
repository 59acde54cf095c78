//! Configuration management for the server.

use formcraft_engine::{persist::STORAGE_KEY, EngineConfig};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL; the schema is kept in memory when unset
    pub database_url: Option<String>,
    /// Key the schema is saved under
    pub storage_key: String,
    /// Defaults for newly created nodes
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let storage_key = env::var("STORAGE_KEY").unwrap_or_else(|_| STORAGE_KEY.to_string());

        let mut engine = EngineConfig::default();
        if let Ok(title) = env::var("DEFAULT_SECTION_TITLE") {
            engine.default_section_title = title;
        }
        if let Ok(spans) = env::var("DEFAULT_ROW_SPANS") {
            engine.default_row_spans = parse_spans(&spans)?;
        }
        engine.validate()?;

        Ok(Self {
            host,
            port,
            database_url,
            storage_key,
            engine,
        })
    }
}

/// Parse a comma separated list of column spans, e.g. `"2,2"`.
fn parse_spans(raw: &str) -> Result<Vec<u8>, ConfigError> {
    raw.split(',')
        .map(|span| {
            span.trim()
                .parse::<u8>()
                .map_err(|_| ConfigError::InvalidRowSpans(raw.to_string()))
        })
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid DEFAULT_ROW_SPANS value: {0}")]
    InvalidRowSpans(String),

    #[error("Invalid engine defaults: {0}")]
    Engine(#[from] formcraft_engine::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spans() {
        assert_eq!(parse_spans("4").unwrap(), vec![4]);
        assert_eq!(parse_spans("2, 2").unwrap(), vec![2, 2]);
        assert!(matches!(
            parse_spans("2,x"),
            Err(ConfigError::InvalidRowSpans(_))
        ));
    }
}
