use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::session::state::SessionConfig;

pub const DURATION_PRESETS: [u64; 4] = [15, 20, 30, 60];

/// Bounds for user-entered durations. The engine itself only rejects zero.
pub const CUSTOM_DURATION_RANGE: RangeInclusive<u64> = 5..=300;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    #[serde(default = "default_word_window_size")]
    pub word_window_size: usize,
    #[serde(default)]
    pub word_list_url: String,
    #[serde(default = "default_test_type")]
    pub test_type: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_duration_secs() -> u64 {
    60
}
fn default_word_window_size() -> usize {
    25
}
fn default_test_type() -> String {
    "time".to_string()
}
fn default_difficulty() -> String {
    "medium".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            word_window_size: default_word_window_size(),
            word_list_url: String::new(),
            test_type: default_test_type(),
            difficulty: default_difficulty(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typepace")
            .join("config.toml")
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.session_config().validate()
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_secs: self.duration_secs,
            window_size: self.word_window_size,
        }
    }

    /// Apply a user-entered duration, keeping the previous value when out of range.
    pub fn set_custom_duration(&mut self, secs: u64) -> EngineResult<()> {
        if !CUSTOM_DURATION_RANGE.contains(&secs) {
            return Err(EngineError::Configuration(format!(
                "duration must be between {} and {} seconds, got {secs}",
                CUSTOM_DURATION_RANGE.start(),
                CUSTOM_DURATION_RANGE.end()
            )));
        }
        self.duration_secs = secs;
        Ok(())
    }

    /// Step to the next preset above the current duration, wrapping to the
    /// shortest one. Returns the new duration.
    pub fn cycle_duration_preset(&mut self) -> u64 {
        self.duration_secs = DURATION_PRESETS
            .into_iter()
            .find(|&p| p > self.duration_secs)
            .unwrap_or(DURATION_PRESETS[0]);
        self.duration_secs
    }

    pub fn word_list_url(&self) -> Option<&str> {
        let url = self.word_list_url.trim();
        (!url.is_empty()).then_some(url)
    }
}
