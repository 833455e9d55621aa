//! Host-facing commands for scan settings.

use crate::{settings::ScanSettings, AppState};

pub async fn get_settings(state: &AppState) -> Result<ScanSettings, String> {
    Ok(state.settings.scan())
}

/// Applies to scan sessions opened after the update.
pub async fn update_settings(
    state: &AppState,
    settings: ScanSettings,
) -> Result<ScanSettings, String> {
    state
        .settings
        .update_scan(settings)
        .map_err(|e| e.to_string())?;
    Ok(state.settings.scan())
}
