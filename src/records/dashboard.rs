use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{HazardClass, ScanRecord};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HazardCounts {
    pub hazardous: usize,
    pub benign: usize,
}

impl HazardCounts {
    pub fn tally<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ScanRecord>,
    {
        records
            .into_iter()
            .fold(Self::default(), |mut counts, record| {
                match record.hazard_class {
                    HazardClass::Hazardous => counts.hazardous += 1,
                    HazardClass::Benign => counts.benign += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.hazardous + self.benign
    }
}

/// One row of the "Recent Scans" list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordCard {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub hazard_class: HazardClass,
    pub hazard_label: String,
    pub confidence: f64,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub image: String,
}

impl From<&ScanRecord> for RecordCard {
    fn from(record: &ScanRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            scientific_name: record.scientific_name.clone(),
            hazard_class: record.hazard_class,
            hazard_label: record.hazard_class.label().to_string(),
            confidence: record.confidence.percent(),
            location: record.location.clone(),
            date: record.date,
            time: record.time,
            image: record.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub counts: HazardCounts,
    pub recent: Vec<RecordCard>,
}

impl DashboardView {
    pub fn build(records: &[ScanRecord]) -> Self {
        Self {
            counts: HazardCounts::tally(records),
            recent: records.iter().map(RecordCard::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixture_records;
    use proptest::prelude::*;

    fn record_with(hazard_class: HazardClass) -> ScanRecord {
        let mut record = fixture_records().unwrap().remove(0);
        record.hazard_class = hazard_class;
        record
    }

    #[test]
    fn empty_set_counts_zero() {
        let counts = HazardCounts::tally(&Vec::<ScanRecord>::new());
        assert_eq!(counts, HazardCounts { hazardous: 0, benign: 0 });
    }

    #[test]
    fn fixture_counts_match_classes() {
        let records = fixture_records().unwrap();
        let counts = HazardCounts::tally(&records);
        assert_eq!(counts.hazardous, 3);
        assert_eq!(counts.benign, 2);
        assert_eq!(counts.total(), records.len());
    }

    #[test]
    fn dashboard_lists_every_record_in_store_order() {
        let records = fixture_records().unwrap();
        let view = DashboardView::build(&records);

        assert_eq!(view.recent.len(), records.len());
        assert_eq!(view.recent[0].id, records[0].id);
        assert_eq!(view.recent[0].hazard_label, "Venomous");
        assert_eq!(view.recent[1].hazard_label, "Non-venomous");
    }

    proptest! {
        #[test]
        fn counts_always_sum_to_total(classes in proptest::collection::vec(any::<bool>(), 0..64)) {
            let records: Vec<ScanRecord> = classes
                .iter()
                .map(|hazardous| record_with(if *hazardous { HazardClass::Hazardous } else { HazardClass::Benign }))
                .collect();

            let counts = HazardCounts::tally(&records);
            prop_assert_eq!(counts.total(), records.len());
            prop_assert_eq!(counts.hazardous, classes.iter().filter(|h| **h).count());
        }
    }
}
