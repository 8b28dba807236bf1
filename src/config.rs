//! Resolution of the remote collection endpoint. The lookup order is an
//! environment variable, then a JSON dotfile under the user's home, then a
//! compiled-in default pointing at a local development server. Everything
//! stays in one module so the precedence rules are easy to audit.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bookshelf-manager";
/// Config file name stored inside the application data directory.
const CONFIG_FILE_NAME: &str = "config.json";
/// Environment variable that overrides any configured endpoint.
const API_URL_ENV: &str = "BOOKSHELF_API_URL";
/// Endpoint used when nothing else is configured.
const DEFAULT_API_URL: &str = "http://localhost:8081/api/books";

#[derive(Debug, Clone, Deserialize)]
/// Settings the application reads at startup. Currently just the collection
/// URL; the struct exists so new fields slot in without touching callers.
pub struct Config {
    /// Full URL of the remote book collection, e.g.
    /// `http://localhost:8081/api/books`.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Resolve the active configuration. A missing config file is not an error;
/// only an unreadable or malformed one is, because silently ignoring a file
/// the user wrote would be confusing.
pub fn load_config() -> Result<Config> {
    if let Ok(url) = env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            return Ok(Config { api_url: url });
        }
    }

    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse the JSON config body. Split out from [`load_config`] so the format
/// can be tested without touching the filesystem.
fn parse_config(raw: &str) -> Result<Config> {
    let config: Config = serde_json::from_str(raw).context("config is not valid JSON")?;
    if config.api_url.trim().is_empty() {
        return Err(anyhow!("api_url must not be empty"));
    }
    Ok(config)
}

/// Resolve the absolute path of the config file inside the user's home.
fn config_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_server() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8081/api/books");
    }

    #[test]
    fn parses_explicit_api_url() {
        let config = parse_config(r#"{"api_url":"http://books.example/api/books"}"#).unwrap();
        assert_eq!(config.api_url, "http://books.example/api/books");
    }

    #[test]
    fn missing_api_url_falls_back_to_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn rejects_blank_api_url() {
        assert!(parse_config(r#"{"api_url":"  "}"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_config("not json").is_err());
    }
}
