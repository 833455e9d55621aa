//! Scan outcome models shared by the scan flow, the record store and the views.

use std::fmt;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

const HAZARD_WARNING: &str =
    "⚠️ Warning: Keep a safe distance. Seek immediate medical attention if bitten.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HazardClass {
    #[serde(rename = "venomous")]
    Hazardous,
    #[serde(rename = "non-venomous")]
    Benign,
}

impl HazardClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardClass::Hazardous => "venomous",
            HazardClass::Benign => "non-venomous",
        }
    }

    pub fn is_hazardous(&self) -> bool {
        matches!(self, HazardClass::Hazardous)
    }

    /// Short badge text used on cards and the result screen.
    pub fn label(&self) -> &'static str {
        match self {
            HazardClass::Hazardous => "Venomous",
            HazardClass::Benign => "Non-venomous",
        }
    }

    pub fn status_title(&self) -> &'static str {
        match self {
            HazardClass::Hazardous => "Venomous Snake",
            HazardClass::Benign => "Non-venomous Snake",
        }
    }

    /// Warning banner text; only hazardous subjects carry one.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            HazardClass::Hazardous => Some(HAZARD_WARNING),
            HazardClass::Benign => None,
        }
    }

    pub fn safety_heading(&self) -> &'static str {
        match self {
            HazardClass::Hazardous => "⚠️ Safety Guidelines",
            HazardClass::Benign => "ℹ️ Safety Guidelines",
        }
    }
}

/// Identification confidence as a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub const MAX: f64 = 100.0;

    pub fn new(percent: f64) -> Result<Self> {
        if percent.is_nan() || !(0.0..=Self::MAX).contains(&percent) {
            bail!("confidence {percent} is outside 0..=100");
        }
        Ok(Self(percent))
    }

    /// For compile-time constants already known to be in range.
    pub(crate) const fn from_static(percent: f64) -> Self {
        Self(percent)
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = anyhow::Error;

    fn try_from(value: f64) -> Result<Self> {
        Confidence::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}%", self.0 as u32)
        } else {
            write!(f, "{:.1}%", self.0)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub subject_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    pub hazard_class: HazardClass,
    pub confidence: Confidence,
}

impl ScanResult {
    pub fn new(
        subject_name: impl Into<String>,
        hazard_class: HazardClass,
        confidence: Confidence,
    ) -> Result<Self> {
        let subject_name = subject_name.into();
        if subject_name.trim().is_empty() {
            return Err(anyhow!("scan result subject name must not be empty"));
        }

        Ok(Self {
            subject_name,
            scientific_name: None,
            hazard_class,
            confidence,
        })
    }

    pub fn with_scientific_name(mut self, scientific_name: impl Into<String>) -> Self {
        self.scientific_name = Some(scientific_name.into());
        self
    }
}
