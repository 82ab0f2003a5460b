// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration and state directory resolution.
//!
//! Configuration is stored in `<state_dir>/config.toml`. Every field has a
//! default, so a missing file is the same as an empty one:
//!
//! ```toml
//! [store]
//! backend = "auto"
//!
//! [remote]
//! url = "ws://localhost:7890"
//! submit_timeout_ms = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use outbox_core::{BackendPreference, StorePaths};
use tokio_tungstenite::tungstenite::http::Uri;

use crate::env;
use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_DIR_NAME: &str = "outbox";

/// Configuration stored in `<state_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    /// Remote collection service (optional - if absent, `drain` and `watch` are unavailable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `auto` tries SQLite first; `fallback` forces the JSON blob store.
    #[serde(default)]
    pub backend: BackendPreference,
}

/// Remote collection service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL, `ws://` or `wss://`.
    pub url: String,
    /// Deadline for one submission, including the acknowledgement (default: 10000).
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,
    /// Deadline for opening the WebSocket (default: 5000).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// How often `watch` probes reachability (default: 2000).
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    /// Deadline for one reachability probe (default: 1000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_submit_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_probe_interval_ms() -> u64 {
    2_000
}

fn default_probe_timeout_ms() -> u64 {
    1_000
}

impl RemoteConfig {
    /// Creates a remote config with default timings.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            submit_timeout_ms: default_submit_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            probe_interval_ms: default_probe_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }

    /// Parses the URL, requiring a `ws`/`wss` scheme and a host.
    pub fn uri(&self) -> Result<Uri> {
        let invalid = |reason: &str| Error::InvalidRemoteUrl {
            url: self.url.clone(),
            reason: reason.to_string(),
        };

        let uri: Uri = self.url.parse().map_err(|_| invalid("not a valid URL"))?;
        match uri.scheme_str() {
            Some("ws") | Some("wss") => {}
            _ => return Err(invalid("scheme must be ws or wss")),
        }
        if matches!(uri.host(), None | Some("")) {
            return Err(invalid("missing host"));
        }
        Ok(uri)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Config {
    /// Loads `config.toml` from the state directory, defaulting when absent.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = state_dir.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Replaces the remote URL, keeping configured timings.
    ///
    /// Creates a `[remote]` section with defaults when none exists.
    pub fn with_remote_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            match self.remote.as_mut() {
                Some(remote) => remote.url = url,
                None => self.remote = Some(RemoteConfig::new(url)),
            }
        }
        self
    }

    /// Returns the remote config, or an error when none is configured.
    pub fn require_remote(&self) -> Result<&RemoteConfig> {
        self.remote.as_ref().ok_or(Error::NoRemote)
    }
}

/// Everything a command needs to know about where state lives.
#[derive(Debug, Clone)]
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
}

impl Context {
    /// Resolves the state directory, loads config and applies environment overrides.
    pub fn load(state_dir_flag: Option<PathBuf>) -> Result<Self> {
        let state_dir = resolve_state_dir(state_dir_flag)?;
        let config = Config::load(&state_dir)?.with_remote_url(env::remote_url());
        Ok(Context { state_dir, config })
    }

    pub fn store_paths(&self) -> StorePaths {
        StorePaths::in_dir(&self.state_dir)
    }
}

/// Resolves the state directory from the flag and the environment.
pub fn resolve_state_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    pick_state_dir(
        flag,
        env::state_dir(),
        env::xdg_state_home(),
        dirs::state_dir(),
        dirs::home_dir(),
    )
    .ok_or(Error::NoStateDir)
}

/// Precedence: flag, `OUTBOX_STATE_DIR`, `$XDG_STATE_HOME/outbox`, platform
/// state dir, `~/.local/state/outbox`.
pub(crate) fn pick_state_dir(
    flag: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg_state_home: Option<PathBuf>,
    platform_state_dir: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    flag.or(env_dir)
        .or_else(|| xdg_state_home.map(|d| d.join(STATE_DIR_NAME)))
        .or_else(|| platform_state_dir.map(|d| d.join(STATE_DIR_NAME)))
        .or_else(|| home.map(|h| h.join(".local").join("state").join(STATE_DIR_NAME)))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
