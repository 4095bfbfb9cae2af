//! Configuration for the vocabulary drill.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vocab-drill")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vocab-drill").map(|d| d.data_dir().to_path_buf())
    }

    /// Catalog file: explicit config override, then the shared data dir,
    /// then the bundled sample relative to the working directory.
    pub fn catalog_path(&self) -> PathBuf {
        if let Some(path) = &self.catalog.path {
            return path.clone();
        }
        match Self::data_dir().map(|d| d.join("words.csv")) {
            Some(path) if path.exists() => path,
            _ => PathBuf::from("data/words.csv"),
        }
    }

    pub fn progress_dir(&self) -> PathBuf {
        Self::data_dir()
            .map(|d| d.join("progress"))
            .unwrap_or_else(|| PathBuf::from("progress"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Correct exposures required before a word counts as mastered.
    #[serde(default = "default_target_count")]
    pub target_count: u32,
    /// Minimum resolved answers between repeat showings of the same word.
    #[serde(default = "default_min_gap")]
    pub min_gap: u64,
    /// Pause after a resolved answer before the next card, in milliseconds.
    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,
}

fn default_target_count() -> u32 {
    3
}
fn default_min_gap() -> u64 {
    5
}
fn default_advance_delay() -> u64 {
    1200
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            target_count: 3,
            min_gap: 5,
            advance_delay_ms: 1200,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Explicit path to the word list CSV.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.study.target_count, 3);
        assert_eq!(config.study.min_gap, 5);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            r#"
            [study]
            min_gap = 2

            [catalog]
            path = "/tmp/words.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.study.min_gap, 2);
        assert_eq!(config.study.target_count, 3);
        assert_eq!(config.catalog.path, Some(PathBuf::from("/tmp/words.csv")));
    }
}
