use std::time::Duration;

use async_trait::async_trait;

use super::*;

struct LibraryOnlyAcquirer;

#[async_trait]
impl ImageAcquirer for LibraryOnlyAcquirer {
    async fn camera_permission(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    async fn request_camera_permission(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    async fn acquire(
        &self,
        source: AcquisitionSource,
        _quality: f32,
    ) -> Result<ImageRef, AcquisitionError> {
        match source {
            AcquisitionSource::Library => Ok(ImageRef::new("content://media/photo/42")),
            AcquisitionSource::Camera => Err(AcquisitionError::CameraUnavailable(
                "no camera".into(),
            )),
        }
    }
}

fn app(dir: &tempfile::TempDir) -> AppState {
    AppState::new(dir.path(), Arc::new(LibraryOnlyAcquirer)).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_scan_flow_adds_record_to_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);

    let before = get_dashboard(&state).await.unwrap();
    assert_eq!(before.counts.total(), 5);

    open_scan(&state).await.unwrap();
    let analyzing = begin_scan(&state, AcquisitionSource::Library).await.unwrap();
    assert_eq!(analyzing.phase.name(), "analyzing");
    assert_eq!(get_scan_result(&state).await.unwrap(), None);

    tokio::time::sleep(Duration::from_millis(3000)).await;

    let view = get_scan_result(&state).await.unwrap().expect("result");
    assert_eq!(view.result.subject_name, "Green Tree Python");
    assert!(!view.show_warning);

    let after = get_dashboard(&state).await.unwrap();
    assert_eq!(after.counts.total(), 6);
    assert_eq!(after.counts.benign, before.counts.benign + 1);

    let record_id = view.record_id.expect("saved record id");
    assert_eq!(after.recent[0].id, record_id);
    let detail = get_record(&state, record_id).await.unwrap();
    assert_eq!(detail.record.name, "Green Tree Python");
}

#[tokio::test]
async fn test_unknown_record_is_not_found_message() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);

    let err = get_record(&state, "no-such-snake".into()).await.unwrap_err();
    assert_eq!(err, "Snake not found");

    let cobra = get_record(&state, "1".into()).await.unwrap();
    assert_eq!(cobra.record.name, "Philippine Cobra");
    assert!(cobra.warning.is_some());
}

#[tokio::test]
async fn test_list_records_returns_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);
    assert_eq!(list_records(&state).await.unwrap().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_camera_failure_reports_user_message() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);
    open_scan(&state).await.unwrap();

    let err = begin_scan(&state, AcquisitionSource::Camera).await.unwrap_err();
    assert_eq!(err, AcquisitionError::PermissionDenied.user_message());
    assert_eq!(
        request_camera_permission(&state).await.unwrap(),
        PermissionStatus::Denied
    );
    assert_eq!(get_scan_state(&state).await.unwrap().phase, ScanPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_without_result_closes_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);
    open_scan(&state).await.unwrap();

    assert_eq!(
        dismiss_scan(&state).await.unwrap(),
        DismissOutcome::LeaveScanFlow
    );
    assert!(get_scan_state(&state).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_result_keeps_session_open() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);
    let session = state.open_scan_session().await;

    begin_scan(&state, AcquisitionSource::Library).await.unwrap();
    session.wait_for_settle().await;

    assert_eq!(
        dismiss_scan(&state).await.unwrap(),
        DismissOutcome::ReturnedToIdle
    );
    assert_eq!(get_scan_state(&state).await.unwrap().phase, ScanPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_opening_scan_closes_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);

    let first = state.open_scan_session().await;
    first.begin_scan(AcquisitionSource::Library).await.unwrap();

    let second = state.open_scan_session().await;
    assert_ne!(
        first.snapshot().await.session_id,
        second.snapshot().await.session_id
    );

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(first.snapshot().await.phase, ScanPhase::Idle);
    assert_eq!(
        first.begin_scan(AcquisitionSource::Library).await.unwrap_err(),
        ScanError::Closed
    );
    assert_eq!(list_records(&state).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_commands_without_open_scan_fail() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);
    assert!(begin_scan(&state, AcquisitionSource::Library).await.is_err());
    assert!(close_scan(&state).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_settings_update_applies_to_next_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);

    let updated = ScanSettings {
        analysis_delay_ms: 500,
        ..get_settings(&state).await.unwrap()
    };
    update_settings(&state, updated).await.unwrap();

    let session = state.open_scan_session().await;
    session.begin_scan(AcquisitionSource::Library).await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(session.snapshot().await.phase.name(), "completed");

    let invalid = ScanSettings {
        camera_quality: 0.0,
        ..ScanSettings::default()
    };
    assert!(update_settings(&state, invalid).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_releasing_stale_session_keeps_newer_one_open() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);

    let dismissed = state.open_scan_session().await;
    let reopened = state.open_scan_session().await;

    state.release_scan_session(&dismissed).await;

    let active = state.active_scan_session().await.expect("newer session");
    assert_eq!(active.session_id(), reopened.session_id());
    let snapshot = begin_scan(&state, AcquisitionSource::Library).await.unwrap();
    assert_eq!(snapshot.session_id, reopened.session_id());
    assert_eq!(
        dismissed.begin_scan(AcquisitionSource::Library).await.unwrap_err(),
        ScanError::Closed
    );
}

#[tokio::test(start_paused = true)]
async fn test_leaving_scan_flow_closes_dismissed_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = app(&dir);
    let session = state.open_scan_session().await;

    begin_scan(&state, AcquisitionSource::Library).await.unwrap();
    assert_eq!(
        dismiss_scan(&state).await.unwrap(),
        DismissOutcome::LeaveScanFlow
    );

    assert!(state.active_scan_session().await.is_none());
    assert_eq!(
        session.begin_scan(AcquisitionSource::Library).await.unwrap_err(),
        ScanError::Closed
    );
    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(list_records(&state).await.unwrap().len(), 5);
}
