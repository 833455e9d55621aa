pub mod acquisition;
pub mod classifier;

pub use acquisition::{
    AcquisitionError, AcquisitionSource, ImageAcquirer, ImageRef, PermissionStatus,
};
pub use classifier::{
    ClassificationError, Classifier, ScriptedClassifier, DEFAULT_ANALYSIS_DELAY_MS,
};
