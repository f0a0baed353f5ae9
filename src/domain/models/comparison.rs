use std::fmt;

use crate::domain::models::version::{VersionRecord, VersionSequence};

/// How listed keys are matched against the requested key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMatch {
    /// Every key starting with the requested key counts
    #[default]
    Prefix,
    /// Only records for exactly the requested key count
    Exact,
}

/// Outcome of inspecting the head of a version listing
#[derive(Debug, Clone, PartialEq)]
pub enum VersionComparison {
    /// Zero or one version was listed
    NothingToCompare,
    Compared {
        latest: VersionRecord,
        previous: VersionRecord,
    },
}

impl VersionComparison {
    pub fn from_sequence(sequence: &VersionSequence) -> Self {
        match sequence.latest_pair() {
            Some((latest, previous)) => VersionComparison::Compared {
                latest: latest.clone(),
                previous: previous.clone(),
            },
            None => VersionComparison::NothingToCompare,
        }
    }
}

/// Renders the report lines, each terminated by a newline
impl fmt::Display for VersionComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionComparison::NothingToCompare => {
                writeln!(f, "Only one version found. No comparison necessary.")
            }
            VersionComparison::Compared { latest, previous } => {
                writeln!(f, "Latest Version ID: {}", latest.version_id)?;
                writeln!(f, "Previous Version ID: {}", previous.version_id)
            }
        }
    }
}
