//! Configuration loading.
//!
//! Settings are layered, later layers winning:
//! built-in defaults → `readme-flip.toml` (or the `--config` file) → CLI
//! flags.  The raw TOML is normalised into a [`Config`] so the rest of the
//! app never sees empty strings standing in for "not set".

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::resolver::ReadmeSource;
use crate::widget::SidebarSection;

pub const CONFIG_FILE_NAME: &str = "readme-flip.toml";

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: ReadmeSource,
    /// Base for relative document locations.
    pub origin: Option<Url>,
    pub log: LogSettings,
    pub sidebar: Vec<SidebarSection>,
    /// The file that was read, if any.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub file: Option<PathBuf>,
    pub level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: LevelFilter::Info,
        }
    }
}

/// Values supplied on the command line.  `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub baseurl: Option<String>,
    pub index: Option<String>,
    pub origin: Option<String>,
    pub strict: bool,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file; must exist.
    pub config_path: Option<PathBuf>,
    /// Directory searched for [`CONFIG_FILE_NAME`]; defaults to the cwd.
    pub working_dir: Option<PathBuf>,
    pub overrides: Overrides,
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory: {0}")]
    WorkingDirectory(#[source] io::Error),
    #[error("config {path} not found")]
    NotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid origin URL `{value}`: {source}")]
    Origin {
        value: String,
        source: url::ParseError,
    },
    #[error("invalid log level `{0}`")]
    LogLevel(String),
    #[error("neither `url` nor `baseurl` is configured and strict mode refuses the fallback URL")]
    Unconfigured,
}

// -- raw TOML shape ----------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    source: RawSource,
    #[serde(default)]
    log: RawLog,
    #[serde(default)]
    sidebar: Vec<SidebarSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSource {
    url: Option<String>,
    baseurl: Option<String>,
    index: Option<RawIndex>,
    origin: Option<String>,
    strict: Option<bool>,
}

/// `index = 3` and `index = "3"` are both accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Number(i64),
    Text(String),
}

impl RawIndex {
    fn into_string(self) -> String {
        match self {
            RawIndex::Number(n) => n.to_string(),
            RawIndex::Text(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLog {
    file: Option<PathBuf>,
    level: Option<String>,
}

impl Config {
    /// Load and merge all layers.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = match options.working_dir {
            Some(dir) => dir,
            None => env::current_dir().map_err(ConfigError::WorkingDirectory)?,
        };

        let path = match options.config_path {
            Some(path) => {
                let path = make_absolute(&path, &working_dir);
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Some(working_dir.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
        };

        let raw = match &path {
            Some(path) => load_file(path)?,
            None => RawConfig::default(),
        };

        Self::merge(raw, options.overrides, path)
    }

    /// Parse a TOML document on its own, without CLI overrides.
    #[cfg(test)]
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let raw = parse(contents, Path::new("<inline>"))?;
        Self::merge(raw, Overrides::default(), None)
    }

    fn merge(raw: RawConfig, overrides: Overrides, file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let RawConfig {
            source,
            log,
            sidebar,
        } = raw;

        let source_config = ReadmeSource::new(
            overrides.url.or(source.url),
            overrides.baseurl.or(source.baseurl),
            overrides
                .index
                .or_else(|| source.index.map(RawIndex::into_string)),
        );

        let origin = overrides
            .origin
            .or(source.origin)
            .filter(|o| !o.is_empty())
            .map(|value| Url::parse(&value).map_err(|source| ConfigError::Origin { value, source }))
            .transpose()?;

        // Strict mode refuses to run against `resolver::FALLBACK_URL`.
        let strict = overrides.strict || source.strict.unwrap_or(false);
        if strict && !source_config.is_configured() {
            return Err(ConfigError::Unconfigured);
        }

        let level = match log.level {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::LogLevel(level))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            source: source_config,
            origin,
            log: LogSettings {
                file: overrides.log_file.or(log.file),
                level,
            },
            sidebar,
            file,
        })
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    parse(&contents, path)
}

fn parse(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
