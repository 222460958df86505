use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::autoplay::AutoplayConfig;
use crate::demos::Visualization;
use crate::ease::Ease;
use crate::error::VizResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub interval_ms: u64,
    pub done_pause_ms: u64,
    pub transition_ms: u64,
    /// Curve applied to forward transitions.
    pub ease: Ease,
    pub reduced_motion: bool,
    pub autoplay: bool,
    pub visualizations: Vec<Visualization>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            done_pause_ms: 1800,
            transition_ms: 400,
            ease: Ease::InOutCubic,
            reduced_motion: false,
            autoplay: true,
            visualizations: Visualization::all().to_vec(),
        }
    }
}

impl Config {
    pub fn autoplay_config(&self) -> AutoplayConfig {
        AutoplayConfig::new(
            Duration::from_millis(self.interval_ms),
            Duration::from_millis(self.done_pause_ms),
        )
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> VizResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> VizResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
