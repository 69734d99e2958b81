use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchOptions,
    #[serde(default)]
    pub translation: TranslationOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchOptions {
    /// Oldest release year covered by a prefetch run.
    #[serde(default = "default_year_start")]
    pub year_start: i32,
    /// Newest release year; also the default year for a single fetch.
    #[serde(default = "default_year_end")]
    pub year_end: i32,
    #[serde(default = "default_light_pages")]
    pub light_pages: u32,
    #[serde(default = "default_deep_pages")]
    pub deep_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_year_start() -> i32 {
    1990
}

fn default_year_end() -> i32 {
    2025
}

fn default_light_pages() -> u32 {
    1
}

fn default_deep_pages() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            year_start: default_year_start(),
            year_end: default_year_end(),
            light_pages: default_light_pages(),
            deep_pages: default_deep_pages(),
        }
    }
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load from TOML; an absent file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.fetch.year_start, 1990);
        assert_eq!(config.fetch.year_end, 2025);
        assert_eq!(config.fetch.light_pages, 1);
        assert_eq!(config.fetch.deep_pages, 4);
        assert!(config.translation.enabled);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.fetch.year_end = 2024;
        config.translation.enabled = false;
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fetch]\nyear_end = 2020\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.fetch.year_end, 2020);
        assert_eq!(config.fetch.year_start, 1990);
        assert!(config.translation.enabled);
    }
}
