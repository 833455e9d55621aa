use std::{sync::Arc, time::Duration};

use chrono::Local;
use tokio::{
    sync::{watch, Mutex},
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    models::{ScanRecord, ScanResult},
    providers::{ClassificationError, Classifier, ImageRef},
    store::RecordStore,
};

use super::state::{ScanSnapshot, ScanState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything the analysis task needs, detached from the session handle so
/// the task never keeps the session alive.
pub(super) struct AnalysisContext {
    pub state: Arc<Mutex<ScanState>>,
    pub updates: Arc<watch::Sender<ScanSnapshot>>,
    pub classifier: Arc<dyn Classifier>,
    pub store: Arc<dyn RecordStore>,
    pub timeout: Duration,
    pub min_confidence: f64,
}

pub(super) async fn analysis_task(
    ctx: AnalysisContext,
    generation: u64,
    image: ImageRef,
    cancel_token: CancellationToken,
) {
    let outcome = tokio::select! {
        outcome = classify(&ctx, &image) => outcome,
        _ = cancel_token.cancelled() => {
            log_info!("analysis of {} cancelled", image);
            return;
        }
    };

    let saved = match &outcome {
        Ok(result) => {
            if !ctx.state.lock().await.owns(generation) {
                log_info!("discarding analysis outcome for superseded attempt {generation}");
                return;
            }
            // The store may be slow; the session lock is not held while it runs.
            let record = ScanRecord::from_result(result, &image, Local::now());
            let record_id = record.id.clone();
            log_debug!("saving scan record {record_id}");
            tokio::select! {
                appended = ctx.store.append(record) => match appended {
                    Ok(()) => Some(record_id),
                    Err(err) => {
                        log_error!("failed to save scan record: {err}");
                        None
                    }
                },
                _ = cancel_token.cancelled() => {
                    log_info!("analysis of {} cancelled while saving", image);
                    return;
                }
            }
        }
        Err(_) => None,
    };

    let mut state = ctx.state.lock().await;
    if cancel_token.is_cancelled() || !state.owns(generation) {
        log_info!("discarding analysis outcome for superseded attempt {generation}");
        return;
    }

    match outcome {
        Ok(result) => {
            log_info!(
                "identified {} ({}, {})",
                result.subject_name,
                result.hazard_class.as_str(),
                result.confidence
            );
            state.complete(generation, result, saved);
        }
        Err(err) => {
            log_warn!("classification failed for {}: {err}", image);
            state.fail(generation, err.user_message());
        }
    }

    ctx.updates.send_replace(state.snapshot());
}

async fn classify(ctx: &AnalysisContext, image: &ImageRef) -> Result<ScanResult, ClassificationError> {
    let result = match time::timeout(ctx.timeout, ctx.classifier.classify(image)).await {
        Ok(outcome) => outcome?,
        Err(_) => return Err(ClassificationError::Timeout),
    };

    let confidence = result.confidence.percent();
    if confidence < ctx.min_confidence {
        return Err(ClassificationError::LowConfidence {
            confidence,
            minimum: ctx.min_confidence,
        });
    }

    Ok(result)
}
