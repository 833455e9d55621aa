use std::{sync::Arc, time::Duration};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    providers::{
        AcquisitionError, AcquisitionSource, Classifier, ImageAcquirer, ImageRef,
        PermissionStatus,
    },
    settings::ScanSettings,
    store::RecordStore,
};

use super::{
    analysis::{analysis_task, AnalysisContext},
    ScanError, ScanPhase, ScanSnapshot, ScanState,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DismissOutcome {
    /// A result was on screen; it is cleared and capture controls return.
    ReturnedToIdle,
    /// Nothing to clear: the caller should leave the scan flow.
    LeaveScanFlow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    pub camera_quality: f32,
    pub library_quality: f32,
    pub min_confidence: f64,
    pub classification_timeout: Duration,
}

impl From<&ScanSettings> for ScanOptions {
    fn from(settings: &ScanSettings) -> Self {
        Self {
            camera_quality: settings.camera_quality,
            library_quality: settings.library_quality,
            min_confidence: settings.min_confidence,
            classification_timeout: settings.classification_timeout(),
        }
    }
}

impl ScanOptions {
    pub fn quality_for(&self, source: AcquisitionSource) -> f32 {
        match source {
            AcquisitionSource::Camera => self.camera_quality,
            AcquisitionSource::Library => self.library_quality,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&ScanSettings::default())
    }
}

/// The in-flight classification. Dropping it cancels the task, so a session
/// that goes away can never receive a late result.
struct PendingAnalysis {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Drop for PendingAnalysis {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

/// One identification attempt lifecycle, from the scan screen opening until
/// it closes. Clones share the same session.
#[derive(Clone)]
pub struct ScanSession {
    session_id: Arc<str>,
    state: Arc<Mutex<ScanState>>,
    pending: Arc<Mutex<Option<PendingAnalysis>>>,
    updates: Arc<watch::Sender<ScanSnapshot>>,
    acquirer: Arc<dyn ImageAcquirer>,
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn RecordStore>,
    options: ScanOptions,
}

impl ScanSession {
    pub fn new(
        acquirer: Arc<dyn ImageAcquirer>,
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn RecordStore>,
        options: ScanOptions,
    ) -> Self {
        let state = ScanState::new();
        let (updates, _) = watch::channel(state.snapshot());
        info!("Opened scan session {}", state.session_id);

        Self {
            session_id: state.session_id.as_str().into(),
            state: Arc::new(Mutex::new(state)),
            pending: Arc::new(Mutex::new(None)),
            updates: Arc::new(updates),
            acquirer,
            classifier,
            store,
            options,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn snapshot(&self) -> ScanSnapshot {
        self.state.lock().await.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.updates.subscribe()
    }

    pub async fn camera_permission(&self) -> PermissionStatus {
        self.acquirer.camera_permission().await
    }

    pub async fn request_camera_permission(&self) -> PermissionStatus {
        let status = self.acquirer.request_camera_permission().await;
        info!("Camera permission request resolved: {:?}", status);
        status
    }

    /// Starts an attempt: acquire an image, then hand it to the classifier.
    ///
    /// Returns once the session is analyzing (or the acquisition failed). A
    /// call made while an attempt is in flight or a result is showing is
    /// ignored and returns the unchanged snapshot.
    pub async fn begin_scan(&self, source: AcquisitionSource) -> Result<ScanSnapshot, ScanError> {
        let generation = {
            let mut state = self.state.lock().await;
            if state.closed {
                return Err(ScanError::Closed);
            }
            match state.begin_capture(source) {
                Some(generation) => generation,
                None => {
                    warn!(
                        "Ignoring scan request from {} while {}",
                        source.as_str(),
                        state.phase.name()
                    );
                    return Ok(state.snapshot());
                }
            }
        };
        self.publish().await;

        let image = match self.acquire(source).await {
            Ok(image) => image,
            Err(err) => {
                warn!("Image acquisition from {} failed: {err}", source.as_str());
                let applied = self.state.lock().await.fail(generation, err.user_message());
                if applied {
                    self.publish().await;
                }
                return Err(err.into());
            }
        };

        {
            let mut pending = self.pending.lock().await;
            let mut state = self.state.lock().await;
            if !state.begin_analysis(generation, image.clone()) {
                info!("Dropping image {image}; attempt {generation} was abandoned");
                return if state.closed {
                    Err(ScanError::Closed)
                } else {
                    Ok(state.snapshot())
                };
            }

            let cancel_token = CancellationToken::new();
            let ctx = AnalysisContext {
                state: self.state.clone(),
                updates: self.updates.clone(),
                classifier: self.classifier.clone(),
                store: self.store.clone(),
                timeout: self.options.classification_timeout,
                min_confidence: self.options.min_confidence,
            };
            let handle = tokio::spawn(analysis_task(ctx, generation, image, cancel_token.clone()));

            // Replacing drops (and cancels) any finished task from an earlier attempt.
            *pending = Some(PendingAnalysis {
                handle,
                cancel_token,
            });
        }

        self.publish().await;
        Ok(self.snapshot().await)
    }

    /// Clears a completed result, or tells the caller to leave the flow.
    pub async fn dismiss(&self) -> DismissOutcome {
        let mut pending = self.pending.lock().await;
        let outcome = {
            let mut state = self.state.lock().await;
            if matches!(state.phase, ScanPhase::Completed { .. }) {
                state.reset();
                DismissOutcome::ReturnedToIdle
            } else if state.phase.is_busy() {
                pending.take();
                state.reset();
                DismissOutcome::LeaveScanFlow
            } else {
                state.notice = None;
                DismissOutcome::LeaveScanFlow
            }
        };
        drop(pending);

        self.publish().await;
        outcome
    }

    /// Tears the session down. Pending analysis is cancelled and every later
    /// call fails with [`ScanError::Closed`].
    pub async fn close(&self) {
        let mut pending = self.pending.lock().await;
        let session_id = {
            let mut state = self.state.lock().await;
            if state.closed {
                return;
            }
            state.close();
            state.session_id.clone()
        };
        pending.take();
        drop(pending);

        info!("Closed scan session {session_id}");
        self.publish().await;
    }

    /// Waits until no attempt is in flight and returns that snapshot.
    pub async fn wait_for_settle(&self) -> ScanSnapshot {
        let mut updates = self.updates.subscribe();
        loop {
            let snapshot = updates.borrow_and_update().clone();
            if !snapshot.phase.is_busy() {
                return snapshot;
            }
            if updates.changed().await.is_err() {
                return self.snapshot().await;
            }
        }
    }

    async fn acquire(&self, source: AcquisitionSource) -> Result<ImageRef, AcquisitionError> {
        if source == AcquisitionSource::Camera
            && !self.acquirer.camera_permission().await.is_granted()
        {
            return Err(AcquisitionError::PermissionDenied);
        }

        self.acquirer
            .acquire(source, self.options.quality_for(source))
            .await
    }

    // Sent under the state lock so snapshots reach subscribers in state order.
    async fn publish(&self) {
        let state = self.state.lock().await;
        self.updates.send_replace(state.snapshot());
    }
}
