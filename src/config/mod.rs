use error_stack::{Report, Result};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use thiserror::Error;

mod database;
mod logging;

pub use self::database::Database;
pub use self::logging::{InvalidLoggingStyle, Logging, LoggingStyle};

use crate::util::figment::FigmentErrorAttachable;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub db: Database,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    const DEFAULT_CONFIG_FILE: &'static str = "scribe.toml";

    /// Loads the configuration from `scribe.toml` (if it exists) and
    /// from the environment, including variables set in `.env`.
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ParseError> {
        if let Some(min_idle) = self.db.min_idle {
            if min_idle > self.db.pool_size {
                return Err(Report::new(ParseError).attach_printable(format!(
                    "db.min_idle ({min_idle}) must not exceed db.pool_size ({})",
                    self.db.pool_size
                )));
            }
        }
        Ok(())
    }

    /// Creates a default [`Figment`] object to load the configuration.
    pub(crate) fn figment() -> Figment {
        let path = std::env::var("SCRIBE_CONFIG")
            .unwrap_or_else(|_| Self::DEFAULT_CONFIG_FILE.to_string());

        Figment::new()
            .merge(Toml::file(path))
            // Environment variable aliases
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "db.url".into()))
            // Env provider cannot tell apart field names with underscores
            // from nested keys, so they're mapped by hand.
            .merge(Env::prefixed("SCRIBE_").ignore(&["CONFIG"]).map(|v| {
                let key = v.as_str().to_ascii_uppercase();
                match key.as_str() {
                    "DB_MIN_IDLE" => "db.min_idle".into(),
                    "DB_POOL_SIZE" => "db.pool_size".into(),
                    "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                    "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),
                    "LOG_TARGETS" => "logging.targets".into(),
                    "LOG_STYLE" => "logging.style".into(),
                    _ => key.replace('_', ".").to_ascii_lowercase().into(),
                }
            }))
    }
}
