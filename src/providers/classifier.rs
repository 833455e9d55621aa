use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

use super::acquisition::ImageRef;
use crate::models::{Confidence, HazardClass, ScanResult};

pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2500;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassificationError {
    #[error("classification service unavailable: {0}")]
    Unavailable(String),

    #[error("classification timed out")]
    Timeout,

    #[error("no snake recognized in image")]
    Unrecognized,

    #[error("confidence {confidence} below minimum {minimum}")]
    LowConfidence { confidence: f64, minimum: f64 },
}

impl ClassificationError {
    pub fn user_message(&self) -> String {
        match self {
            ClassificationError::Unavailable(_) => {
                "Identification service is unreachable. Check your connection and try again.".into()
            }
            ClassificationError::Timeout => {
                "Identification took too long. Please try again.".into()
            }
            ClassificationError::Unrecognized => {
                "No snake was recognized. Make sure the snake is clearly visible and well-lit."
                    .into()
            }
            ClassificationError::LowConfidence { .. } => {
                "We couldn't identify this snake with enough confidence. Try a clearer photo."
                    .into()
            }
        }
    }
}

/// Turns an acquired image into an identification.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &ImageRef) -> Result<ScanResult, ClassificationError>;
}

/// Development stand-in for the inference service: waits a fixed delay and
/// returns the same identification for every image.
#[derive(Debug, Clone)]
pub struct ScriptedClassifier {
    delay: Duration,
    outcome: Result<ScanResult, ClassificationError>,
}

impl ScriptedClassifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            outcome: Ok(canned_result()),
        }
    }

    pub fn with_outcome(delay: Duration, outcome: Result<ScanResult, ClassificationError>) -> Self {
        Self { delay, outcome }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for ScriptedClassifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS))
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, image: &ImageRef) -> Result<ScanResult, ClassificationError> {
        debug!("scripted classification of {} ({}ms)", image, self.delay.as_millis());
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }
}

fn canned_result() -> ScanResult {
    ScanResult {
        subject_name: "Green Tree Python".to_string(),
        scientific_name: Some("Morelia viridis".to_string()),
        hazard_class: HazardClass::Benign,
        confidence: Confidence::from_static(96.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn scripted_classifier_waits_then_returns_canned_result() {
        let classifier = ScriptedClassifier::default();
        let started = tokio::time::Instant::now();

        let result = classifier
            .classify(&ImageRef::new("file:///any.jpg"))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS));
        assert_eq!(result.subject_name, "Green Tree Python");
        assert_eq!(result.hazard_class, HazardClass::Benign);
        assert_eq!(result.confidence.percent(), 96.0);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_failure_is_returned_verbatim() {
        let classifier = ScriptedClassifier::with_outcome(
            Duration::from_millis(10),
            Err(ClassificationError::Unrecognized),
        );
        let err = classifier
            .classify(&ImageRef::new("file:///blurry.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err, ClassificationError::Unrecognized);
    }
}
