/// Database configuration and connection management
pub mod database;

/// Application settings loaded from settings.toml and the environment
pub mod settings;
