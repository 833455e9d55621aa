use crate::{
    models::ScanRecord,
    records::{DashboardView, RecordDetail},
    AppState,
};

pub async fn list_records(state: &AppState) -> Result<Vec<ScanRecord>, String> {
    Ok(state.store.list().await)
}

pub async fn get_dashboard(state: &AppState) -> Result<DashboardView, String> {
    let records = state.store.list().await;
    Ok(DashboardView::build(&records))
}

pub async fn get_record(state: &AppState, record_id: String) -> Result<RecordDetail, String> {
    state
        .store
        .get(&record_id)
        .await
        .map(RecordDetail::from)
        .map_err(|e| e.user_message())
}
