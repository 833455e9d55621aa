use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::providers::DEFAULT_ANALYSIS_DELAY_MS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanSettings {
    /// Delay used by the scripted classifier.
    pub analysis_delay_ms: u64,
    pub classification_timeout_ms: u64,
    /// Results below this percentage are reported as low confidence.
    pub min_confidence: f64,
    /// JPEG quality for camera captures.
    pub camera_quality: f32,
    /// Quality for photos picked from the library.
    pub library_quality: f32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            classification_timeout_ms: 15_000,
            min_confidence: 50.0,
            camera_quality: 0.5,
            library_quality: 1.0,
        }
    }
}

impl ScanSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_confidence.is_nan() || !(0.0..=100.0).contains(&self.min_confidence) {
            bail!("minConfidence must be between 0 and 100");
        }
        for (name, quality) in [
            ("cameraQuality", self.camera_quality),
            ("libraryQuality", self.library_quality),
        ] {
            if !(quality > 0.0 && quality <= 1.0) {
                bail!("{name} must be in (0, 1]");
            }
        }
        if self.classification_timeout_ms == 0 {
            bail!("classificationTimeoutMs must be greater than zero");
        }
        // The scripted classifier would never beat the timeout.
        if self.analysis_delay_ms >= self.classification_timeout_ms {
            bail!("analysisDelayMs must be shorter than classificationTimeoutMs");
        }
        Ok(())
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn classification_timeout(&self) -> Duration {
        Duration::from_millis(self.classification_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    scan: ScanSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<UserSettings>(&contents) {
                Ok(parsed) if parsed.scan.validate().is_ok() => parsed,
                Ok(_) | Err(_) => {
                    warn!("Ignoring invalid settings file {}", path.display());
                    UserSettings::default()
                }
            }
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn scan(&self) -> ScanSettings {
        self.read().scan.clone()
    }

    pub fn update_scan(&self, settings: ScanSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        let previous = std::mem::replace(&mut guard.scan, settings);
        if let Err(err) = self.persist(&guard) {
            guard.scan = previous;
            return Err(err);
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
