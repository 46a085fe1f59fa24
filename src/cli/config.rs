use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::FileCredentials;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub url: String,
    pub description: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub servers: HashMap<String, ServerInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub current_server: Option<String>,
    pub current_user: Option<String>,
}

impl ServerInfo {
    pub fn new(url: String, description: String) -> Self {
        Self {
            url,
            description,
            added_at: Utc::now(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TENANT_ADMIN_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("tenant-admin")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

fn load_json<T: Default + for<'de> Deserialize<'de>>(file: &Path) -> anyhow::Result<T> {
    if !file.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(file)?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file {}: {}", file.display(), e))
}

fn save_json<T: Serialize>(file: &Path, value: &T) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(file, content)?;
    Ok(())
}

pub fn load_server_config_from(dir: &Path) -> anyhow::Result<ServerConfig> {
    load_json(&dir.join("server.json"))
}

pub fn save_server_config_to(dir: &Path, config: &ServerConfig) -> anyhow::Result<()> {
    save_json(&dir.join("server.json"), config)
}

pub fn load_environment_config_from(dir: &Path) -> anyhow::Result<EnvironmentConfig> {
    load_json(&dir.join("env.json"))
}

pub fn save_environment_config_to(dir: &Path, config: &EnvironmentConfig) -> anyhow::Result<()> {
    save_json(&dir.join("env.json"), config)
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    load_server_config_from(&get_config_dir()?)
}

pub fn save_server_config(config: &ServerConfig) -> anyhow::Result<()> {
    save_server_config_to(&get_config_dir()?, config)
}

pub fn load_environment_config() -> anyhow::Result<EnvironmentConfig> {
    load_environment_config_from(&get_config_dir()?)
}

pub fn save_environment_config(config: &EnvironmentConfig) -> anyhow::Result<()> {
    save_environment_config_to(&get_config_dir()?, config)
}

/// Token store used by the CLI, kept next to the other config files
pub fn credentials() -> anyhow::Result<FileCredentials> {
    Ok(FileCredentials::new(get_config_dir()?.join("token.json")))
}

/// Explicit flag, then the current server, then the environment default
pub fn resolve_base_url_in(dir: &Path, flag: Option<&str>) -> anyhow::Result<String> {
    if let Some(url) = flag {
        return Ok(url.to_string());
    }

    let env_config = load_environment_config_from(dir)?;
    if let Some(name) = env_config.current_server {
        let servers = load_server_config_from(dir)?;
        return match servers.servers.get(&name) {
            Some(info) => Ok(info.url.clone()),
            None => Err(anyhow::anyhow!("Current server '{}' not found in configuration", name)),
        };
    }

    Ok(crate::config::config().api.base_url.clone())
}

pub fn resolve_base_url(flag: Option<&str>) -> anyhow::Result<String> {
    resolve_base_url_in(&get_config_dir()?, flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_load_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_server_config_from(dir.path()).unwrap().servers.is_empty());
        assert!(load_environment_config_from(dir.path()).unwrap().current_server.is_none());
    }

    #[test]
    fn base_url_prefers_flag_then_current_server() {
        let dir = tempfile::tempdir().unwrap();

        let mut servers = ServerConfig::default();
        servers.servers.insert(
            "staging".to_string(),
            ServerInfo::new("http://staging:9000".to_string(), String::new()),
        );
        save_server_config_to(dir.path(), &servers).unwrap();
        save_environment_config_to(
            dir.path(),
            &EnvironmentConfig {
                current_server: Some("staging".to_string()),
                current_user: None,
            },
        )
        .unwrap();

        assert_eq!(
            resolve_base_url_in(dir.path(), Some("http://flag:1")).unwrap(),
            "http://flag:1"
        );
        assert_eq!(resolve_base_url_in(dir.path(), None).unwrap(), "http://staging:9000");
    }

    #[test]
    fn dangling_current_server_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        save_environment_config_to(
            dir.path(),
            &EnvironmentConfig {
                current_server: Some("gone".to_string()),
                current_user: None,
            },
        )
        .unwrap();

        assert!(resolve_base_url_in(dir.path(), None).is_err());
    }
}
