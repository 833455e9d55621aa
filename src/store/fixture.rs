use anyhow::{Context, Result};

use crate::models::ScanRecord;

const FIXTURE_JSON: &str = include_str!("../../fixtures/records.json");

/// Sample scan history bundled with the app until real history exists.
pub fn fixture_records() -> Result<Vec<ScanRecord>> {
    serde_json::from_str(FIXTURE_JSON).context("failed to parse bundled scan fixtures")
}
