use thiserror::Error;

use crate::providers::{AcquisitionError, ClassificationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScanError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error("scan session is closed")]
    Closed,
}

impl ScanError {
    pub fn user_message(&self) -> String {
        match self {
            ScanError::Acquisition(err) => err.user_message(),
            ScanError::Classification(err) => err.user_message(),
            ScanError::Closed => "The scan screen was closed.".into(),
        }
    }
}
