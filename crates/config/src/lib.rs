//! Runtime configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. built-in defaults,
//! 2. a configuration file (TOML, YAML or JSON, chosen by extension),
//! 3. environment variables prefixed with `VULNDB_`, e.g.
//!    `VULNDB_MAX_CONCURRENCY=4`.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "VULNDB_";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound on table loaders reading from a snapshot at once. Zero
    /// and one both mean sequential loading.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for Config {
    fn default() -> Self {
        Self { max_concurrency: DEFAULT_MAX_CONCURRENCY }
    }
}

impl Config {
    /// `config.toml` in the platform configuration directory, if the
    /// platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "vulndb").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default file (if present) and the environment.
    pub fn load() -> Result<Self> {
        Self::extract(Self::layered(Self::default_path().as_deref())?.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load from `path` and the environment. A missing file contributes
    /// nothing; an unreadable or malformed one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::extract(Self::layered(Some(path.as_ref()))?.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Defaults with the file at `path` merged over them.
    fn layered(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        let Some(path) = path else {
            return Ok(figment);
        };
        debug!(path = %path.display(), "reading configuration file");
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        Ok(match extension.to_ascii_lowercase().as_str() {
            "toml" => figment.merge(Toml::file(path)),
            "yaml" | "yml" => figment.merge(Yaml::file(path)),
            "json" => figment.merge(Json::file(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(extension.to_string())),
        })
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment.extract::<Self>().or_raise(|| ErrorKind::Parse)
    }
}
