use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::ScanResult,
    providers::{AcquisitionSource, ImageRef},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum ScanPhase {
    Idle,
    Capturing {
        source: AcquisitionSource,
    },
    Analyzing {
        image: ImageRef,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        result: ScanResult,
        /// History entry saved for this result, when saving succeeded.
        record_id: Option<String>,
    },
}

impl Default for ScanPhase {
    fn default() -> Self {
        ScanPhase::Idle
    }
}

impl ScanPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ScanPhase::Idle => "idle",
            ScanPhase::Capturing { .. } => "capturing",
            ScanPhase::Analyzing { .. } => "analyzing",
            ScanPhase::Completed { .. } => "completed",
        }
    }

    /// Capturing or analyzing: an attempt is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, ScanPhase::Capturing { .. } | ScanPhase::Analyzing { .. })
    }

    pub fn result(&self) -> Option<&ScanResult> {
        match self {
            ScanPhase::Completed { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub session_id: String,
    #[serde(flatten)]
    pub phase: ScanPhase,
    /// User-facing message for the last failed attempt.
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScanState {
    pub session_id: String,
    pub phase: ScanPhase,
    pub notice: Option<String>,
    pub closed: bool,
    /// Bumped whenever an attempt starts or is abandoned; work tagged with an
    /// older generation must not touch the state.
    generation: u64,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            phase: ScanPhase::Idle,
            notice: None,
            closed: false,
            generation: 0,
        }
    }
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            session_id: self.session_id.clone(),
            phase: self.phase.clone(),
            notice: self.notice.clone(),
        }
    }

    /// Idle → Capturing. Returns the generation owning the new attempt, or
    /// `None` when the session cannot start one.
    pub fn begin_capture(&mut self, source: AcquisitionSource) -> Option<u64> {
        if self.closed || !matches!(self.phase, ScanPhase::Idle) {
            return None;
        }
        self.generation += 1;
        self.phase = ScanPhase::Capturing { source };
        self.notice = None;
        Some(self.generation)
    }

    /// Capturing → Analyzing, only for the attempt that is still current.
    pub fn begin_analysis(&mut self, generation: u64, image: ImageRef) -> bool {
        if !self.owns(generation) || !matches!(self.phase, ScanPhase::Capturing { .. }) {
            return false;
        }
        self.phase = ScanPhase::Analyzing { image };
        true
    }

    /// Analyzing → Completed.
    pub fn complete(
        &mut self,
        generation: u64,
        result: ScanResult,
        record_id: Option<String>,
    ) -> bool {
        if !self.owns(generation) || !matches!(self.phase, ScanPhase::Analyzing { .. }) {
            return false;
        }
        self.phase = ScanPhase::Completed { result, record_id };
        true
    }

    /// Failed attempt: back to Idle with a notice for the user.
    pub fn fail(&mut self, generation: u64, notice: String) -> bool {
        if !self.owns(generation) || !self.phase.is_busy() {
            return false;
        }
        self.phase = ScanPhase::Idle;
        self.notice = Some(notice);
        true
    }

    /// Abandons whatever is in flight and returns to a clean Idle.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = ScanPhase::Idle;
        self.notice = None;
    }

    pub fn close(&mut self) {
        self.reset();
        self.closed = true;
    }

    pub fn owns(&self, generation: u64) -> bool {
        !self.closed && self.generation == generation
    }
}
