//! Historical scan entries shown on the dashboard and detail screens.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scan::{Confidence, HazardClass, ScanResult};
use crate::providers::ImageRef;

pub const UNKNOWN_LOCATION: &str = "Unknown location";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    #[serde(rename = "type")]
    pub hazard_class: HazardClass,
    pub confidence: Confidence,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habitat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecological_role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_guidelines: Vec<String>,
}

impl ScanRecord {
    /// Builds the history entry for a finished scan. Classifier output carries
    /// no field notes, so the extended fields stay empty.
    ///
    /// Date and time are stored as wall-clock values in `captured_at`'s zone,
    /// matching the fixture history.
    pub fn from_result<Tz: TimeZone>(
        result: &ScanResult,
        image: &ImageRef,
        captured_at: DateTime<Tz>,
    ) -> Self {
        let local = captured_at.naive_local();
        Self {
            id: Uuid::new_v4().to_string(),
            name: result.subject_name.clone(),
            scientific_name: result.scientific_name.clone().unwrap_or_default(),
            hazard_class: result.hazard_class,
            confidence: result.confidence,
            location: UNKNOWN_LOCATION.to_string(),
            date: local.date(),
            time: local.time(),
            image: image.as_str().to_string(),
            description: None,
            traits: Vec::new(),
            habitat: None,
            behavior: None,
            ecological_role: None,
            safety_guidelines: Vec::new(),
        }
    }

    pub fn is_hazardous(&self) -> bool {
        self.hazard_class.is_hazardous()
    }
}
