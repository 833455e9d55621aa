use log::info;

use crate::{
    providers::{AcquisitionSource, PermissionStatus},
    records::ResultView,
    scan::{DismissOutcome, ScanPhase, ScanSession, ScanSnapshot},
    AppState,
};

const NO_ACTIVE_SCAN: &str = "The scan screen is not open.";

async fn active_session(state: &AppState) -> Result<ScanSession, String> {
    state
        .active_scan_session()
        .await
        .ok_or_else(|| NO_ACTIVE_SCAN.to_string())
}

/// The scan screen opened.
pub async fn open_scan(state: &AppState) -> Result<ScanSnapshot, String> {
    let session = state.open_scan_session().await;
    Ok(session.snapshot().await)
}

pub async fn get_scan_state(state: &AppState) -> Result<ScanSnapshot, String> {
    let session = active_session(state).await?;
    Ok(session.snapshot().await)
}

pub async fn begin_scan(
    state: &AppState,
    source: AcquisitionSource,
) -> Result<ScanSnapshot, String> {
    let session = active_session(state).await?;
    session
        .begin_scan(source)
        .await
        .map_err(|e| e.user_message())
}

/// Close button. Leaving the flow also tears the session down.
pub async fn dismiss_scan(state: &AppState) -> Result<DismissOutcome, String> {
    let session = active_session(state).await?;
    let outcome = session.dismiss().await;
    if outcome == DismissOutcome::LeaveScanFlow {
        info!("Leaving scan flow for session {}", session.session_id());
        state.release_scan_session(&session).await;
    }
    Ok(outcome)
}

/// The user navigated away from the scan screen.
pub async fn close_scan(state: &AppState) -> Result<(), String> {
    state.close_scan_session().await;
    Ok(())
}

pub async fn request_camera_permission(state: &AppState) -> Result<PermissionStatus, String> {
    let session = active_session(state).await?;
    Ok(session.request_camera_permission().await)
}

pub async fn get_scan_result(state: &AppState) -> Result<Option<ResultView>, String> {
    let session = active_session(state).await?;
    let snapshot = session.snapshot().await;
    Ok(match snapshot.phase {
        ScanPhase::Completed { result, record_id } => Some(ResultView::new(result, record_id)),
        _ => None,
    })
}
