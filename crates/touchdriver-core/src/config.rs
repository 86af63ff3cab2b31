//! Execution engine configuration.
//!
//! Settings are stored in `~/.touchdriver/config.json`. Every field has a
//! default, so a missing or partial file is fine.
//!
//! # Example
//!
//! ```no_run
//! use touchdriver_core::config::ExecutorConfig;
//!
//! let mut config = ExecutorConfig::load();
//! config.debug = true;
//! config.save().expect("failed to write config");
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_DIRNAME: &str = ".touchdriver";
const CONFIG_FILENAME: &str = "config.json";

/// Environment variable that forces call tracing on (`1`/`true`) or off.
pub const DEBUG_ENV_VAR: &str = "TOUCHDRIVER_DEBUG";

fn default_log_capacity() -> usize {
    100
}

/// Configuration threaded into an [`ActionExecutor`](crate::executor::ActionExecutor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Emit a debug event for every `perform` call with its arguments.
    #[serde(default)]
    pub debug: bool,

    /// Abort the action task when its deadline passes instead of letting it
    /// run to completion in the background.
    #[serde(default)]
    pub abort_on_timeout: bool,

    /// Number of perform records kept in memory and buffered per subscriber.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            abort_on_timeout: false,
            log_capacity: default_log_capacity(),
        }
    }
}

/// Returns `~/.touchdriver`, or `None` if the home directory is unknown.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIRNAME))
}

impl ExecutorConfig {
    /// Load config from `~/.touchdriver/config.json`, then apply
    /// [`DEBUG_ENV_VAR`].
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        let mut config: Self = config_dir()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        if let Ok(value) = std::env::var(DEBUG_ENV_VAR) {
            config.debug = parse_flag(&value);
        }
        config
    }

    /// Save config to `~/.touchdriver/config.json`.
    pub fn save(&self) -> std::io::Result<()> {
        let dir = config_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        std::fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(dir.join(CONFIG_FILENAME), json)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_abort_on_timeout(mut self, abort: bool) -> Self {
        self.abort_on_timeout = abort;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
