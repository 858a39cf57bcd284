//! User settings: built-in defaults + optional TOML file.
//!
//! - `Settings::default()` → built-in values
//! - `Settings::from_toml_file(path)` → parse a user file
//! - `Settings::load(path)` → file if present, otherwise defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::FinalHashMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay between rounds during `play`.
    pub playback_interval_ms: u64,
    pub final_hash_mode: FinalHashMode,
    pub show_padding: bool,
    pub color: bool,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playback_interval_ms: 250,
            final_hash_mode: FinalHashMode::Standard,
            show_padding: true,
            color: true,
            debug: false,
        }
    }
}

impl Settings {
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        toml::from_str(txt).context("parsing settings")
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&txt).with_context(|| format!("parsing {}", path.display()))
    }

    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::from_toml_file(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing settings")
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    // ~\Users\you\.shastep\config.toml on Windows; ~/.shastep/config.toml elsewhere
    dirs_next::home_dir().map(|h| h.join(".shastep").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create config parent dir {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let s = Settings::from_toml_str("final_hash_mode = \"raw\"\n").unwrap();
        assert_eq!(s.final_hash_mode, FinalHashMode::Raw);
        assert_eq!(s.playback_interval_ms, 250);
        assert!(s.show_padding);
    }

    #[test]
    fn malformed_is_rejected() {
        assert!(Settings::from_toml_str("playback_interval_ms = \"fast\"").is_err());
        assert!(Settings::from_toml_str("final_hash_mode = \"sloppy\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn written_defaults_parse_back() {
        let txt = Settings::default().to_toml().unwrap();
        assert_eq!(Settings::from_toml_str(&txt).unwrap(), Settings::default());
    }

    #[test]
    fn cli_path_wins() {
        let p = PathBuf::from("custom.toml");
        assert_eq!(resolve_config_path(&Some(p.clone())), Some(p));
    }
}
