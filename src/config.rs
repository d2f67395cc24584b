//! Configuration management
//!
//! Settings come from an optional TOML file under the platform config
//! directory, overridden by environment variables. The widget's locale
//! preference is a single key-value persisted under the data directory;
//! when no storage is available it degrades to in-memory only.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::{Error, Result};

/// Default gateway port
pub const DEFAULT_PORT: u16 = 7860;

/// Default upstream completion endpoint
const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com";

/// Default upstream model
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default max tokens for replies (kept short for speech)
const DEFAULT_MAX_TOKENS: u32 = 512;

/// Vaani configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gateway listen port
    pub port: u16,
    /// Gateway base URL the widget talks to
    pub gateway_url: String,
    /// Upstream completion API settings
    pub upstream: UpstreamConfig,
    /// Data directory for the preference store
    pub data_dir: Option<PathBuf>,
}

/// Upstream completion API settings
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// API key; required to run the gateway
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Max tokens per reply
    pub max_tokens: u32,
}

/// On-disk configuration file shape
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    upstream: FileUpstream,
}

#[derive(Debug, Default, Deserialize)]
struct FileServer {
    port: Option<u16>,
    gateway_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileUpstream {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be parsed
    pub fn load() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "vaani", "vaani");

        let file = match dirs
            .as_ref()
            .map(|d| d.config_dir().join("config.toml"))
            .filter(|p| p.exists())
        {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)?;
                tracing::debug!(path = %path.display(), "loaded config file");
                toml::from_str::<FileConfig>(&raw)?
            }
            None => FileConfig::default(),
        };

        let port = env_var("VAANI_PORT")
            .map(|v| {
                v.parse::<u16>()
                    .map_err(|_| Error::Config(format!("invalid VAANI_PORT: {v}")))
            })
            .transpose()?
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let gateway_url = env_var("VAANI_GATEWAY_URL")
            .or(file.server.gateway_url)
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let upstream = UpstreamConfig {
            base_url: env_var("VAANI_UPSTREAM_URL")
                .or(file.upstream.base_url)
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            api_key: env_var("VAANI_UPSTREAM_KEY")
                .or_else(|| env_var("OPENAI_API_KEY"))
                .or(file.upstream.api_key),
            model: env_var("VAANI_MODEL")
                .or(file.upstream.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: env_var("VAANI_MAX_TOKENS")
                .map(|v| {
                    v.parse::<u32>()
                        .map_err(|_| Error::Config(format!("invalid VAANI_MAX_TOKENS: {v}")))
                })
                .transpose()?
                .or(file.upstream.max_tokens)
                .unwrap_or(DEFAULT_MAX_TOKENS),
        };

        Ok(Self {
            port,
            gateway_url,
            upstream,
            data_dir: dirs.map(|d| d.data_dir().to_path_buf()),
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Persisted locale preference shape
#[derive(Debug, Serialize, Deserialize)]
struct PrefsFile {
    locale: Locale,
}

/// Locale preference persisted across sessions
///
/// Backed by a single file under the data directory; without a usable
/// path it is session-scoped only and every operation still succeeds.
#[derive(Debug)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    locale: Locale,
}

impl PreferenceStore {
    /// Load the preference from `data_dir`, defaulting to the primary
    /// locale when nothing is stored or storage is unavailable
    #[must_use]
    pub fn load(data_dir: Option<&Path>) -> Self {
        let path = data_dir.map(|dir| dir.join("prefs.toml"));

        let locale = path
            .as_deref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|raw| toml::from_str::<PrefsFile>(&raw).ok())
            .map_or_else(Locale::default, |prefs| prefs.locale);

        Self { path, locale }
    }

    /// Current locale preference
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Update the preference, persisting best-effort
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;

        let Some(path) = self.path.as_deref() else {
            return;
        };

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let raw = toml::to_string(&PrefsFile { locale })
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            std::fs::write(path, raw)
        };

        if let Err(e) = write() {
            tracing::debug!(error = %e, "locale preference not persisted, keeping in-memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("vaani-prefs-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_preference_roundtrip() {
        let dir = scratch_dir();
        let mut store = PreferenceStore::load(Some(&dir));
        assert_eq!(store.locale(), Locale::En);

        store.set_locale(Locale::Kn);

        let reloaded = PreferenceStore::load(Some(&dir));
        assert_eq!(reloaded.locale(), Locale::Kn);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_storage_degrades_to_memory() {
        let mut store = PreferenceStore::load(None);
        store.set_locale(Locale::Kn);
        assert_eq!(store.locale(), Locale::Kn);
    }

    #[test]
    fn test_corrupt_prefs_fall_back_to_default() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("prefs.toml"), "not valid toml [[").unwrap();

        let store = PreferenceStore::load(Some(&dir));
        assert_eq!(store.locale(), Locale::En);

        std::fs::remove_dir_all(&dir).ok();
    }
}
