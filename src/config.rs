use serde::Deserialize;
use std::path::PathBuf;

/// Sentinel `DATABASE_PATH` selecting the non-persistent in-memory store
pub const MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // SQLite file holding the leads table
    #[serde(default = "default_database_path")]
    pub database_path: String,

    // Origins that receive Access-Control-Allow-Origin (comma-separated in the environment)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_path == MEMORY_DATABASE
    }

    pub fn database_file(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_path: default_database_path(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> String {
    "leads.db".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://movieque.com".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_path, "leads.db");
        assert!(config
            .allowed_origins
            .contains(&"https://movieque.com".to_string()));
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", ":memory:"),
            ("ALLOWED_ORIGINS", "https://a.example,https://b.example"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.uses_memory_store());
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_invalid_port() {
        assert!(from_pairs(&[("PORT", "not-a-port")]).is_err());
    }
}
