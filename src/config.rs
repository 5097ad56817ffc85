//! Application configuration.
//!
//! Values are resolved with priority: config.toml > environment (.env) > default.

use serde::Deserialize;
use std::path::PathBuf;

use crate::srs::SuggestionOptions;

const CONFIG_FILE: &str = "config.toml";

// ==================== Config File ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
    suggestions: Option<SuggestionOptions>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

fn parse_config(contents: &str) -> AppConfig {
    match toml::from_str::<AppConfig>(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid {}: {}", CONFIG_FILE, e);
            AppConfig::default()
        }
    }
}

fn read_config() -> AppConfig {
    std::fs::read_to_string(CONFIG_FILE)
        .map(|contents| parse_config(&contents))
        .unwrap_or_default()
}

// ==================== Database Configuration ====================

/// Default database location
pub const DEFAULT_DATABASE_PATH: &str = "data/study.db";

fn resolve_database_path(config: &AppConfig, env_path: Option<String>) -> PathBuf {
    // Priority 1: config.toml
    if let Some(path) = config.database.as_ref().and_then(|db| db.path.clone()) {
        tracing::info!("Using database from {}: {}", CONFIG_FILE, path);
        return PathBuf::from(path);
    }

    // Priority 2: DATABASE_PATH
    if let Some(path) = env_path {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(DEFAULT_DATABASE_PATH);
    tracing::info!("Using default database path: {}", default.display());
    default
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    resolve_database_path(&read_config(), std::env::var("DATABASE_PATH").ok())
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

fn resolve_server_port(config: &AppConfig, env_port: Option<String>) -> u16 {
    if let Some(port) = config.server.as_ref().and_then(|s| s.port) {
        return port;
    }

    match env_port.map(|p| p.parse::<u16>()) {
        Some(Ok(port)) => port,
        Some(Err(e)) => {
            tracing::warn!("Invalid SERVER_PORT, using {}: {}", SERVER_PORT, e);
            SERVER_PORT
        }
        None => SERVER_PORT,
    }
}

/// Port to listen on: config.toml > SERVER_PORT env > 3000
pub fn load_server_port() -> u16 {
    let _ = dotenvy::dotenv();
    resolve_server_port(&read_config(), std::env::var("SERVER_PORT").ok())
}

/// Get the full server bind address
pub fn server_bind_addr(port: u16) -> String {
    format!("{}:{}", SERVER_ADDR, port)
}

// ==================== Suggestion Configuration ====================

/// Suggestion tuning from the `[suggestions]` table; missing keys use defaults
pub fn load_suggestion_options() -> SuggestionOptions {
    read_config().suggestions.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_wins_over_env() {
        let config = parse_config("[database]\npath = \"/tmp/from-config.db\"\n");
        let path = resolve_database_path(&config, Some("/tmp/from-env.db".into()));
        assert_eq!(path, PathBuf::from("/tmp/from-config.db"));
    }

    #[test]
    fn test_env_path_then_default() {
        let config = parse_config("");
        assert_eq!(
            resolve_database_path(&config, Some("/tmp/from-env.db".into())),
            PathBuf::from("/tmp/from-env.db")
        );
        assert_eq!(resolve_database_path(&config, None), PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let config = parse_config("this is = = not toml");
        assert!(config.database.is_none());
        assert_eq!(resolve_database_path(&config, None), PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn test_server_port() {
        let config = parse_config("[server]\nport = 8080\n");
        assert_eq!(resolve_server_port(&config, Some("9000".into())), 8080);

        let empty = parse_config("");
        assert_eq!(resolve_server_port(&empty, Some("9000".into())), 9000);
        assert_eq!(resolve_server_port(&empty, Some("nope".into())), SERVER_PORT);
        assert_eq!(resolve_server_port(&empty, None), SERVER_PORT);
        assert_eq!(server_bind_addr(8080), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_suggestion_table() {
        let config = parse_config("[suggestions]\nmax_review_items = 3\ngrind_difficulty_threshold = 2.0\n");
        let options = config.suggestions.unwrap();
        let defaults = SuggestionOptions::default();

        assert_eq!(options.max_review_items, 3);
        assert!((options.grind_difficulty_threshold - 2.0).abs() < 1e-9);
        assert_eq!(options.max_grind_items, defaults.max_grind_items);
        assert_eq!(options.young_new_items_limit, defaults.young_new_items_limit);
    }
}
