use crate::error::{OrbitalError, Result};
use crate::session::DEFAULT_HIGHLIGHT_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for orbital, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrbitalConfig {
    /// How long a search selection stays highlighted, in milliseconds
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,

    /// JSON file listing the open tabs. The built-in tab set is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs_file: Option<PathBuf>,
}

fn default_highlight_ms() -> u64 {
    DEFAULT_HIGHLIGHT_MS
}

impl Default for OrbitalConfig {
    fn default() -> Self {
        Self {
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            tabs_file: None,
        }
    }
}

impl OrbitalConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(OrbitalError::Io)?;
        let config: OrbitalConfig =
            serde_json::from_str(&content).map_err(OrbitalError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(OrbitalError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(OrbitalError::Serialization)?;
        fs::write(config_path, content).map_err(OrbitalError::Io)?;
        Ok(())
    }

    /// Set a key from its textual form, as given on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "highlight-ms" => {
                self.highlight_ms = value.trim().parse().map_err(|_| {
                    OrbitalError::InvariantViolation(format!(
                        "highlight-ms must be a number of milliseconds, got '{}'",
                        value
                    ))
                })?;
            }
            "tabs-file" => {
                let value = value.trim();
                self.tabs_file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => {
                return Err(OrbitalError::InvariantViolation(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// All keys with their current textual values.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("highlight-ms", self.highlight_ms.to_string()),
            (
                "tabs-file",
                self.tabs_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}
