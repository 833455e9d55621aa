pub mod models;
pub mod providers;
pub mod records;
pub mod scan;
pub mod settings;
mod settings_commands;
pub mod store;
mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::info;
use tokio::sync::Mutex;

pub use models::{Confidence, HazardClass, ScanRecord, ScanResult};
pub use providers::{
    AcquisitionError, AcquisitionSource, ClassificationError, Classifier, ImageAcquirer,
    ImageRef, PermissionStatus, ScriptedClassifier,
};
pub use records::{
    commands::{get_dashboard, get_record, list_records},
    DashboardView, HazardCounts, RecordCard, RecordDetail, ResultView,
};
pub use scan::{
    commands::{
        begin_scan, close_scan, dismiss_scan, get_scan_result, get_scan_state, open_scan,
        request_camera_permission,
    },
    DismissOutcome, ScanError, ScanOptions, ScanPhase, ScanSession, ScanSnapshot,
};
pub use settings::{ScanSettings, SettingsStore};
pub use settings_commands::{get_settings, update_settings};
pub use store::{fixture_records, MemoryRecordStore, RecordError, RecordStore};

/// Root composition: owns the record store, settings and device providers,
/// and the single scan session that may be open at a time.
pub struct AppState {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) settings: SettingsStore,
    acquirer: Arc<dyn ImageAcquirer>,
    /// When unset, each session gets a scripted classifier built from the
    /// current settings.
    classifier: Option<Arc<dyn Classifier>>,
    scan: Mutex<Option<ScanSession>>,
}

impl AppState {
    /// Wires the app the way the mobile host starts it: settings from
    /// `app_data_dir`, history seeded from the bundled fixture.
    pub fn new(app_data_dir: &Path, acquirer: Arc<dyn ImageAcquirer>) -> Result<Self> {
        std::fs::create_dir_all(app_data_dir).with_context(|| {
            format!("failed to create app data directory {}", app_data_dir.display())
        })?;
        let settings = SettingsStore::new(app_data_dir.join("settings.json"))?;
        let store = MemoryRecordStore::with_records(fixture_records()?);

        Ok(Self::with_parts(settings, Arc::new(store), acquirer, None))
    }

    pub fn with_parts(
        settings: SettingsStore,
        store: Arc<dyn RecordStore>,
        acquirer: Arc<dyn ImageAcquirer>,
        classifier: Option<Arc<dyn Classifier>>,
    ) -> Self {
        Self {
            store,
            settings,
            acquirer,
            classifier,
            scan: Mutex::new(None),
        }
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    /// Opens a fresh scan session, closing whichever one was open.
    pub async fn open_scan_session(&self) -> ScanSession {
        let mut slot = self.scan.lock().await;
        if let Some(previous) = slot.take() {
            previous.close().await;
        }

        let scan_settings = self.settings.scan();
        let classifier: Arc<dyn Classifier> = match &self.classifier {
            Some(classifier) => classifier.clone(),
            None => Arc::new(ScriptedClassifier::new(scan_settings.analysis_delay())),
        };

        let session = ScanSession::new(
            self.acquirer.clone(),
            classifier,
            self.store.clone(),
            ScanOptions::from(&scan_settings),
        );
        *slot = Some(session.clone());
        session
    }

    pub async fn active_scan_session(&self) -> Option<ScanSession> {
        self.scan.lock().await.clone()
    }

    pub async fn close_scan_session(&self) {
        if let Some(session) = self.scan.lock().await.take() {
            session.close().await;
        }
    }

    /// Closes `session` and empties the slot only if it still holds that
    /// session; a newer session opened meanwhile stays active.
    pub async fn release_scan_session(&self, session: &ScanSession) {
        session.close().await;
        let mut slot = self.scan.lock().await;
        if slot
            .as_ref()
            .is_some_and(|active| active.session_id() == session.session_id())
        {
            slot.take();
        }
    }
}

/// Initialise logging once. `RUST_LOG` wins; otherwise `SNAKESCAN_DEBUG=1`
/// selects debug level and the default is info.
pub fn init_logging() {
    let debug_mode = std::env::var("SNAKESCAN_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let level = if debug_mode {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let initialised = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_ok();

    if initialised {
        info!("SnakeScan core starting up...");
    }
}

#[cfg(test)]
mod tests;
