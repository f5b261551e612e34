//! Application settings loading from settings.toml
//!
//! Settings cover the concerns this core needs from its deployment: where the
//! database lives, where the external area catalog is reachable, and how long
//! the folio counter cache stays warm. A `.env` file (via `dotenvy`) or real
//! environment variables can override the database URL.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default folio cache TTL in seconds.
const fn default_folio_refresh_secs() -> u64 {
    5
}

/// Configuration structure representing the settings.toml file
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Database URL; `DATABASE_URL` in the environment takes precedence
    #[serde(default)]
    pub database_url: Option<String>,
    /// Base URL of the external area/infrastructure catalog
    pub catalog_base_url: String,
    /// Seconds before the folio counter cache is refreshed from storage
    #[serde(default = "default_folio_refresh_secs")]
    pub folio_refresh_secs: u64,
}

impl Settings {
    /// Resolves the effective database URL: environment first, then the
    /// settings file, then the crate default.
    #[must_use]
    pub fn effective_database_url(&self) -> String {
        std::env::var("DATABASE_URL")
            .ok()
            .or_else(|| self.database_url.clone())
            .unwrap_or_else(super::database::get_database_url)
    }
}

/// Loads settings from a TOML file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings.toml: {e}"),
    })
}

/// Loads settings from the default location (./settings.toml), after making
/// any `.env` file visible to the environment-first overrides.
pub fn load_default_settings() -> Result<Settings> {
    dotenvy::dotenv().ok();
    load_settings("settings.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            database_url = "sqlite://data/test.sqlite"
            catalog_base_url = "http://catalog.internal/"
            folio_refresh_secs = 10
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("sqlite://data/test.sqlite")
        );
        assert_eq!(settings.catalog_base_url, "http://catalog.internal/");
        assert_eq!(settings.folio_refresh_secs, 10);
    }

    #[test]
    fn test_parse_settings_defaults() {
        let toml_str = r#"catalog_base_url = "http://catalog.internal/""#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert!(settings.database_url.is_none());
        assert_eq!(settings.folio_refresh_secs, 5);
    }

    #[test]
    fn test_missing_settings_file() {
        let result = load_settings("definitely/not/a/real/path.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
