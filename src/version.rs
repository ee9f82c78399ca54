use serde::{Deserialize, Serialize};

/// Whether the simulator that produced a result matches the one that
/// produced its template.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Match,
    Mismatch,
    Unknown,
}

pub trait VersionCheck {
    fn check(&self) -> VersionStatus;
}

impl VersionCheck for VersionStatus {
    fn check(&self) -> VersionStatus {
        *self
    }
}

/// Compares the simulator version recorded with a template against the
/// version used for the new result.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ExpectedVersion {
    pub expected: Option<String>,
    pub observed: Option<String>,
}

impl ExpectedVersion {
    pub fn new(expected: Option<String>, observed: Option<String>) -> Self {
        Self { expected, observed }
    }
}

impl VersionCheck for ExpectedVersion {
    fn check(&self) -> VersionStatus {
        match (self.expected.as_deref(), self.observed.as_deref()) {
            (Some(expected), Some(observed)) if expected.trim() == observed.trim() => {
                VersionStatus::Match
            }
            (Some(_), Some(_)) => VersionStatus::Mismatch,
            _ => VersionStatus::Unknown,
        }
    }
}
