//! Server configuration for the assistant engine
//!
//! Resolves the backend base URL from (in order of priority):
//! 1. The NIGHTPREP_API_URL environment variable
//! 2. JSON file (~/.config/nightprep/server.json)
//! 3. The localhost default

use serde::Deserialize;

/// Server config filename in the nightprep config directory
const SERVER_FILE: &str = "server.json";

/// Environment variable overriding the backend base URL
const API_URL_ENV: &str = "NIGHTPREP_API_URL";

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: String,
}

/// On-disk server.json format
#[derive(Deserialize)]
struct ServerFile {
    base_url: String,
}

impl ServerConfig {
    /// Fallback used when nothing is configured
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Create a config pointing at a specific base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Resolve the base URL using the documented priority order
    pub fn load() -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            return Self::new(url.trim());
        }

        if config::config_exists(SERVER_FILE)
            && let Ok(file) = config::load_json::<ServerFile>(SERVER_FILE)
        {
            return Self::new(file.base_url);
        }

        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_url() {
        let cfg = ServerConfig::new("https://api.example.com");
        assert_eq!(cfg.base_url, "https://api.example.com");
    }

    #[test]
    fn test_default_base_url() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_server_file_format() {
        let file: ServerFile =
            serde_json::from_str(r#"{"base_url":"https://api.example.com"}"#).unwrap();
        assert_eq!(file.base_url, "https://api.example.com");
    }
}
