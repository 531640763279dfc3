use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a record. Wire tags outside the known set are
/// preserved as `Other` rather than rejected; tag drift on the backend must
/// not break the sync loop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CaseStatus {
    Active,
    Complete,
    PingedLow,
    PingedMed,
    PingedHigh,
    Acknowledged,
    Resolved,
    Unpinged,
    Other(String),
}

impl CaseStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => CaseStatus::Active,
            "complete" => CaseStatus::Complete,
            "pingedlow" => CaseStatus::PingedLow,
            "pingedmed" => CaseStatus::PingedMed,
            "pingedhigh" => CaseStatus::PingedHigh,
            "acknowledged" => CaseStatus::Acknowledged,
            "resolved" => CaseStatus::Resolved,
            "unpinged" => CaseStatus::Unpinged,
            _ => CaseStatus::Other(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CaseStatus::Active => "active",
            CaseStatus::Complete => "complete",
            CaseStatus::PingedLow => "pingedlow",
            CaseStatus::PingedMed => "pingedmed",
            CaseStatus::PingedHigh => "pingedhigh",
            CaseStatus::Acknowledged => "acknowledged",
            CaseStatus::Resolved => "resolved",
            CaseStatus::Unpinged => "unpinged",
            CaseStatus::Other(tag) => tag,
        }
    }

    /// Severity of an open ping status. Non-ping statuses have none.
    pub fn severity(&self) -> Option<PingSeverity> {
        match self {
            CaseStatus::PingedLow => Some(PingSeverity::Low),
            CaseStatus::PingedMed => Some(PingSeverity::Moderate),
            CaseStatus::PingedHigh => Some(PingSeverity::High),
            _ => None,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for CaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CaseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(CaseStatus::parse(&tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PingSeverity {
    Low,
    Moderate,
    High,
}

impl PingSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            PingSeverity::Low => "Low",
            PingSeverity::Moderate => "Moderate",
            PingSeverity::High => "High",
        }
    }
}
