//! Simulation error kinds
//!
//! Per-frame failures are reported, logged by the orchestrator and skipped;
//! only construction and wave generation surface them to the host.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// The enemy table has no row for this (1-based) stage
    MissingStage { stage: u32 },
    /// The weapon table has no row for this weapon index
    MissingWeapon { index: usize },
    /// The condition table has no row for this condition index
    MissingCondition { index: usize },
    /// A balance table line did not hold a number
    InvalidNumber { line: usize, text: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStage { stage } => {
                write!(f, "balance table has no enemy row for stage {stage}")
            }
            Self::MissingWeapon { index } => {
                write!(f, "balance table has no weapon row for index {index}")
            }
            Self::MissingCondition { index } => {
                write!(f, "balance table has no condition row for index {index}")
            }
            Self::InvalidNumber { line, text } => {
                write!(f, "line {line}: expected a number, got {text:?}")
            }
        }
    }
}

impl std::error::Error for SimError {}
