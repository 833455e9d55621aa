use serde::{Deserialize, Serialize};

use crate::models::{ScanRecord, ScanResult};

/// Everything the detail screen renders for one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: ScanRecord,
    pub status_title: String,
    pub confidence_text: String,
    pub warning: Option<String>,
    pub safety_heading: Option<String>,
}

impl From<ScanRecord> for RecordDetail {
    fn from(record: ScanRecord) -> Self {
        let hazard = record.hazard_class;
        let safety_heading = (!record.safety_guidelines.is_empty())
            .then(|| hazard.safety_heading().to_string());

        Self {
            status_title: hazard.status_title().to_string(),
            confidence_text: format!("Confidence: {}", record.confidence),
            warning: hazard.warning().map(str::to_string),
            safety_heading,
            record,
        }
    }
}

/// The result card shown at the end of a scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    #[serde(flatten)]
    pub result: ScanResult,
    pub hazard_label: String,
    pub confidence_text: String,
    pub show_warning: bool,
    /// Present when the result was saved to history.
    pub record_id: Option<String>,
}

impl ResultView {
    pub fn new(result: ScanResult, record_id: Option<String>) -> Self {
        Self {
            hazard_label: result.hazard_class.label().to_string(),
            confidence_text: format!("Confidence: {}", result.confidence),
            show_warning: result.hazard_class.is_hazardous(),
            result,
            record_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Confidence, HazardClass},
        store::fixture_records,
    };

    #[test]
    fn hazardous_record_has_warning_banner() {
        let cobra = fixture_records().unwrap().remove(0);
        assert!(cobra.is_hazardous());

        let detail = RecordDetail::from(cobra);
        assert_eq!(detail.status_title, "Venomous Snake");
        assert_eq!(detail.confidence_text, "Confidence: 94%");
        assert!(detail.warning.is_some());
        assert_eq!(detail.safety_heading.as_deref(), Some("⚠️ Safety Guidelines"));
    }

    #[test]
    fn benign_record_has_no_warning() {
        let python = fixture_records().unwrap().remove(1);
        let detail = RecordDetail::from(python);
        assert_eq!(detail.status_title, "Non-venomous Snake");
        assert!(detail.warning.is_none());
        assert_eq!(detail.safety_heading.as_deref(), Some("ℹ️ Safety Guidelines"));
    }

    #[test]
    fn record_without_guidelines_has_no_safety_section() {
        let viper = fixture_records()
            .unwrap()
            .into_iter()
            .find(|r| r.id == "5")
            .unwrap();
        assert!(RecordDetail::from(viper).safety_heading.is_none());
    }

    #[test]
    fn result_view_flags_hazardous_results() {
        let result = ScanResult::new(
            "Philippine Cobra",
            HazardClass::Hazardous,
            Confidence::new(94.0).unwrap(),
        )
        .unwrap();

        let view = ResultView::new(result, None);
        assert!(view.show_warning);
        assert_eq!(view.hazard_label, "Venomous");
        assert_eq!(view.confidence_text, "Confidence: 94%");
    }

    #[test]
    fn detail_serializes_record_fields_inline() {
        let detail = RecordDetail::from(fixture_records().unwrap().remove(1));
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["type"], "non-venomous");
        assert_eq!(value["statusTitle"], "Non-venomous Snake");
    }
}
