pub mod record;
pub mod scan;

pub use record::{ScanRecord, UNKNOWN_LOCATION};
pub use scan::{Confidence, HazardClass, ScanResult};
