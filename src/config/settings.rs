use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analytics::{RateWindow, TargetFrequency, DEFAULT_TRAILING_WEEKS};

fn default_target_frequency() -> TargetFrequency {
    TargetFrequency::DAILY
}
fn default_trailing_weeks() -> usize {
    DEFAULT_TRAILING_WEEKS
}
fn default_rate_window_days() -> RateWindow {
    RateWindow::DEFAULT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitsConfig {
    /// Days per week for new habits when `--target` is not given.
    #[serde(default = "default_target_frequency")]
    pub default_target_frequency: TargetFrequency,
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            default_target_frequency: default_target_frequency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Weeks with data included in the weekly completion rate.
    #[serde(default = "default_trailing_weeks")]
    pub trailing_weeks: usize,
    /// Length of the day-based completion rate window, 1 to 3660 days.
    #[serde(default = "default_rate_window_days")]
    pub rate_window_days: RateWindow,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            trailing_weeks: default_trailing_weeks(),
            rate_window_days: default_rate_window_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub habits: HabitsConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "habitus")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("habitus.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Serializing config")
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
