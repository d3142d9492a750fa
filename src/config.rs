//! Configuration
//!
//! The config file names the session identity and the backing paths:
//!
//! ```toml
//! [user]
//! name = "alice"
//! computer = "box"
//!
//! [paths]
//! vfs = "fs.zip"
//! log = "session.log"
//! ```
//!
//! Two syntaxes are accepted: TOML first, and on failure a plain INI
//! rendering of the same groups. If neither parses the error carries both
//! messages so the user sees why each attempt failed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {message}")]
    Read { path: String, message: String },

    #[error("config is not valid TOML ({toml}) nor INI ({ini})")]
    Parse { toml: String, ini: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub user: UserConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub name: String,
    pub computer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub vfs: PathBuf,
    pub log: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, ConfigError> {
        let toml_err = match toml::from_str::<Config>(text) {
            Ok(config) => return Ok(config),
            Err(e) => e.to_string(),
        };
        match parse_ini(text) {
            Ok(config) => Ok(config),
            Err(ini_err) => Err(ConfigError::Parse {
                toml: toml_err,
                ini: ini_err,
            }),
        }
    }
}

/// Minimal INI reader: `[section]` headers, `key = value` pairs, `#`/`;`
/// comment lines. Values are taken verbatim after trimming.
fn parse_ini(text: &str) -> Result<Config, String> {
    let mut section = String::new();
    let mut values: Vec<(String, String)> = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = name.trim().to_string();
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => values.push((
                format!("{}.{}", section, key.trim()),
                value.trim().to_string(),
            )),
            None => return Err(format!("line {}: expected 'key = value'", lineno + 1)),
        }
    }

    let lookup = |key: &str| -> Result<String, String> {
        values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| format!("missing key '{}'", key))
    };

    Ok(Config {
        user: UserConfig {
            name: lookup("user.name")?,
            computer: lookup("user.computer")?,
        },
        paths: PathsConfig {
            vfs: PathBuf::from(lookup("paths.vfs")?),
            log: PathBuf::from(lookup("paths.log")?),
        },
    })
}
