//! User configuration.
//!
//! Read from `config.toml` in the platform config directory (for example
//! `~/.config/lacuna/config.toml`), from `$LACUNA_CONFIG`, or from an explicit
//! `--config` path. Every field is optional; a missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scan::{ScanEngine, ScanRequest};

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    File(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings shared by the TUI and the headless scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Folder pre-filled in the TUI root field.
    pub default_root: Option<PathBuf>,
    /// Exclusion terms always applied, merged with the ones typed in.
    pub exclusions: Vec<String>,
    /// Match exclusion terms regardless of case.
    pub exclusions_ignore_case: bool,
    /// Walk the tree once up front so progress shows an exact total. Turn off
    /// for very slow filesystems where the extra pass is expensive.
    pub count_before_scan: bool,
    /// How often the TUI polls for input and scan progress.
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_root: None,
            exclusions: Vec::new(),
            exclusions_ignore_case: false,
            count_before_scan: true,
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    /// Load configuration.
    /// Evaluation order:
    /// 1) `explicit` path (from `--config`), which must exist,
    /// 2) `$LACUNA_CONFIG`, which must exist,
    /// 3) the default file, if present,
    /// 4) built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load_from_file(path)?, ConfigSource::File(path.to_path_buf())));
        }

        if let Ok(raw) = env::var("LACUNA_CONFIG") {
            if !raw.trim().is_empty() {
                let path = PathBuf::from(raw);
                let config = Self::load_from_file(&path)?;
                return Ok((config, ConfigSource::EnvPath(path)));
            }
        }

        if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents, path)
    }

    pub fn parse(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lacuna").join("config.toml"))
    }

    /// Engine tuned by this configuration.
    pub fn engine(&self) -> ScanEngine {
        ScanEngine::new()
            .with_count_before_scan(self.count_before_scan)
            .with_ignore_case_exclusions(self.exclusions_ignore_case)
    }

    /// Build a request, prepending the configured exclusions to `extra`.
    pub fn request(
        &self,
        root: impl Into<PathBuf>,
        query: impl Into<String>,
        extra: &[String],
    ) -> ScanRequest {
        let mut terms = self.exclusions.clone();
        for term in extra {
            if !terms.contains(term) {
                terms.push(term.clone());
            }
        }
        ScanRequest::new(root, query).with_exclusions(&terms)
    }
}
