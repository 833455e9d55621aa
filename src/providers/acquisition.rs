use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the image for a scan comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AcquisitionSource {
    Camera,
    Library,
}

impl AcquisitionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionSource::Camera => "camera",
            AcquisitionSource::Library => "library",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    Undetermined,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Opaque handle to an acquired image. The core never looks inside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("camera permission not granted")]
    PermissionDenied,

    #[error("image acquisition cancelled by user")]
    Cancelled,

    #[error("image acquisition failed: {0}")]
    Failed(String),
}

impl AcquisitionError {
    pub fn user_message(&self) -> String {
        match self {
            AcquisitionError::CameraUnavailable(_) => {
                "The camera is not available right now. Try again or pick a photo instead.".into()
            }
            AcquisitionError::PermissionDenied => {
                "Camera permission is required to scan snakes.".into()
            }
            AcquisitionError::Cancelled => "No photo was selected.".into(),
            AcquisitionError::Failed(_) => "Could not get a photo. Please try again.".into(),
        }
    }
}

/// Device capability that produces images: the live camera or the media library.
#[async_trait]
pub trait ImageAcquirer: Send + Sync {
    async fn camera_permission(&self) -> PermissionStatus;

    async fn request_camera_permission(&self) -> PermissionStatus;

    /// `quality` is the requested compression quality in `(0, 1]`.
    async fn acquire(
        &self,
        source: AcquisitionSource,
        quality: f32,
    ) -> Result<ImageRef, AcquisitionError>;
}
